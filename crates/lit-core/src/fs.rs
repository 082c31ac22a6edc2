//! Filesystem access used by discovery
//!
//! Discovery never touches `std::fs` directly; every existence check, listing
//! and read goes through a [`FileSystem`]. [`OsFileSystem`] is the real one,
//! [`MemoryFileSystem`] is an in-memory tree that also counts calls so
//! memoization can be observed.

use crate::path_utils::{normalize_lexically, real_path};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Filesystem operations needed by discovery
pub trait FileSystem: fmt::Debug + Send + Sync {
    /// Absolute path with symlinks resolved.
    ///
    /// Never fails: the longest existing prefix is resolved and the rest is
    /// appended after lexical normalization.
    fn canonicalize(&self, path: &Path) -> PathBuf;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Basenames of the directory's entries, sorted
    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn current_dir(&self) -> io::Result<PathBuf>;
}

/// The host filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn canonicalize(&self, path: &Path) -> PathBuf {
        real_path(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = std::fs::read_dir(path)?
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort();
        Ok(names)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }
}

/// Call counts recorded by [`MemoryFileSystem`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FsStats {
    pub exists: usize,
    pub is_dir: usize,
    pub read_dir: usize,
    pub read_to_string: usize,
}

/// In-memory directory tree
///
/// Paths are absolute. Adding a file creates its parent directories.
/// There are no symlinks, so canonicalization is lexical.
#[derive(Debug)]
pub struct MemoryFileSystem {
    cwd: PathBuf,
    dirs: Mutex<BTreeSet<PathBuf>>,
    files: Mutex<BTreeMap<PathBuf, String>>,
    exists_calls: AtomicUsize,
    is_dir_calls: AtomicUsize,
    read_dir_calls: AtomicUsize,
    read_calls: AtomicUsize,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileSystem {
    /// Empty tree containing only `/`, with `/` as the working directory
    pub fn new() -> Self {
        let mut dirs = BTreeSet::new();
        dirs.insert(PathBuf::from("/"));
        Self {
            cwd: PathBuf::from("/"),
            dirs: Mutex::new(dirs),
            files: Mutex::new(BTreeMap::new()),
            exists_calls: AtomicUsize::new(0),
            is_dir_calls: AtomicUsize::new(0),
            read_dir_calls: AtomicUsize::new(0),
            read_calls: AtomicUsize::new(0),
        }
    }

    /// Set the working directory used for relative inputs
    pub fn with_current_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        self.add_dir(&cwd);
        self.cwd = cwd;
        self
    }

    /// Create a directory and all of its parents
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = normalize_lexically(path.as_ref());
        let mut dirs = self.dirs.lock().unwrap_or_else(|e| e.into_inner());
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
    }

    /// Create a file, creating its parent directories
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = normalize_lexically(path.as_ref());
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path, content.into());
    }

    /// Calls made so far
    pub fn stats(&self) -> FsStats {
        FsStats {
            exists: self.exists_calls.load(Ordering::Relaxed),
            is_dir: self.is_dir_calls.load(Ordering::Relaxed),
            read_dir: self.read_dir_calls.load(Ordering::Relaxed),
            read_to_string: self.read_calls.load(Ordering::Relaxed),
        }
    }

    /// Reset all call counters to zero
    pub fn reset_stats(&self) {
        self.exists_calls.store(0, Ordering::Relaxed);
        self.is_dir_calls.store(0, Ordering::Relaxed);
        self.read_dir_calls.store(0, Ordering::Relaxed);
        self.read_calls.store(0, Ordering::Relaxed);
    }

    fn has_dir(&self, path: &Path) -> bool {
        self.dirs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(path)
    }

    fn has_file(&self, path: &Path) -> bool {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(path)
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            normalize_lexically(path)
        } else {
            normalize_lexically(&self.cwd.join(path))
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn canonicalize(&self, path: &Path) -> PathBuf {
        self.absolute(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_calls.fetch_add(1, Ordering::Relaxed);
        let path = self.absolute(path);
        self.has_dir(&path) || self.has_file(&path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_calls.fetch_add(1, Ordering::Relaxed);
        self.has_dir(&self.absolute(path))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        self.read_dir_calls.fetch_add(1, Ordering::Relaxed);
        let path = self.absolute(path);
        if !self.has_dir(&path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", path.display()),
            ));
        }

        let child_name = |candidate: &Path| -> Option<String> {
            if candidate.parent() != Some(path.as_path()) {
                return None;
            }
            match candidate.components().next_back() {
                Some(Component::Normal(name)) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            }
        };

        let mut names = BTreeSet::new();
        for dir in self.dirs.lock().unwrap_or_else(|e| e.into_inner()).iter() {
            names.extend(child_name(dir));
        }
        for file in self.files.lock().unwrap_or_else(|e| e.into_inner()).keys() {
            names.extend(child_name(file));
        }
        Ok(names.into_iter().collect())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.read_calls.fetch_add(1, Ordering::Relaxed);
        let path = self.absolute(path);
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&path)
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such file: {}", path.display()),
                )
            })
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.cwd.clone())
    }
}
