//! Path helpers: canonicalization, executable lookup, file listing

use std::collections::BTreeSet;
use std::env;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Canonicalize a path that may not exist.
///
/// Relative paths are taken from the current directory. The longest existing
/// prefix has its symlinks resolved; the remainder is normalized lexically.
pub fn real_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    if let Ok(resolved) = std::fs::canonicalize(&absolute) {
        return resolved;
    }

    let normalized = normalize_lexically(&absolute);
    for ancestor in normalized.ancestors().skip(1) {
        if let Ok(resolved) = std::fs::canonicalize(ancestor) {
            if let Ok(rest) = normalized.strip_prefix(ancestor) {
                return resolved.join(rest);
            }
        }
    }
    normalized
}

/// Remove `.` components and fold `..` into the preceding component
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Check whether a path is a file the current user can execute
pub fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = path.metadata() else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Find `command` in a search path.
///
/// `paths` uses the platform's `PATH` syntax and defaults to the `PATH`
/// environment variable. An absolute command that exists is returned
/// canonicalized. Empty search entries mean the current directory.
pub fn which(command: &Path, paths: Option<&OsStr>) -> Option<PathBuf> {
    if command.is_absolute() {
        return command.exists().then(|| real_path(command));
    }

    let search = match paths {
        Some(paths) => paths.to_os_string(),
        None => env::var_os("PATH")?,
    };

    for dir in env::split_paths(&search) {
        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir
        };
        let candidate = dir.join(command);
        if is_executable(&candidate) {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let candidate = candidate.with_extension("exe");
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Whether every one of `tools` exists in `dir`
pub fn check_tools_path<S: AsRef<str>>(dir: &Path, tools: &[S]) -> bool {
    tools.iter().all(|tool| dir.join(tool.as_ref()).exists())
}

/// First directory in `paths` that holds all of `tools`.
///
/// `paths` uses the platform's `PATH` syntax. Useful for picking one
/// installation when several are on the search path.
pub fn which_tools<S: AsRef<str>>(tools: &[S], paths: &OsStr) -> Option<PathBuf> {
    env::split_paths(paths).find(|dir| check_tools_path(dir, tools))
}

/// Recursively list files under `dir` whose names end in one of `suffixes`.
///
/// An empty suffix list accepts every file. Hidden entries and entries whose
/// basename is in `exclude_names` are skipped, and excluded or hidden
/// directories are not descended into. Results are sorted by path.
pub fn listdir_files(
    dir: &Path,
    suffixes: &[String],
    exclude_names: &BTreeSet<String>,
) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let keep = |name: &str| !name.starts_with('.') && !exclude_names.contains(name);

    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || keep(&entry.file_name().to_string_lossy()))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            suffixes.is_empty() || suffixes.iter().any(|s| name.ends_with(s.as_str()))
        })
        .map(|entry| entry.into_path())
        .collect()
}
