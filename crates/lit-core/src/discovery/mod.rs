//! Test discovery
//!
//! Turns input paths into `(suite, tests)` pairs:
//! - [`resolver`]: find the suite owning a directory, memoized per canonical path
//! - [`local_config`]: effective config at a path inside a suite
//! - [`enumerate`]: list the tests under a path inside a suite
//! - [`inputs`]: expand `@file` inputs and drive the above for each input
//!
//! Discovery is single-threaded. A [`Discovery`] owns its cache and must not
//! be shared between concurrent runs.

pub mod enumerate;
pub mod inputs;
pub mod local_config;
pub mod resolver;

use crate::fs::FileSystem;
use crate::lit_config::LitConfig;
use crate::suite::TestSuite;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use enumerate::is_ignored_entry;
pub use inputs::{expand_inputs, find_tests_for_inputs, load_tests, try_find_tests_for_inputs};
pub use local_config::get_local_config;

/// Outcome of looking up the suite for a path
#[derive(Debug, Clone, Default)]
pub struct SuiteSearchResult {
    /// The owning suite, or `None` if no suite contains the path
    pub suite: Option<Arc<TestSuite>>,
    /// Components from the suite's root down to the path
    pub path_in_suite: Vec<String>,
}

impl SuiteSearchResult {
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn found(suite: Arc<TestSuite>, path_in_suite: Vec<String>) -> Self {
        Self {
            suite: Some(suite),
            path_in_suite,
        }
    }

    pub fn is_found(&self) -> bool {
        self.suite.is_some()
    }
}

/// Suite lookups keyed by canonical directory
#[derive(Debug, Default)]
pub struct DiscoveryCache {
    entries: HashMap<PathBuf, SuiteSearchResult>,
}

impl DiscoveryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dir: &Path) -> Option<&SuiteSearchResult> {
        self.entries.get(dir)
    }

    /// Record the result for `dir`. An existing entry is kept.
    pub fn insert(&mut self, dir: PathBuf, result: SuiteSearchResult) -> SuiteSearchResult {
        self.entries.entry(dir).or_insert(result).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// State for one discovery run
#[derive(Debug)]
pub struct Discovery<'a> {
    lit_config: &'a LitConfig,
    cache: DiscoveryCache,
}

impl<'a> Discovery<'a> {
    pub fn new(lit_config: &'a LitConfig) -> Self {
        Self {
            lit_config,
            cache: DiscoveryCache::new(),
        }
    }

    pub fn lit_config(&self) -> &'a LitConfig {
        self.lit_config
    }

    pub fn cache(&self) -> &DiscoveryCache {
        &self.cache
    }
}

/// First file in `dir` named by one of `names`
pub fn choose_config_file_from_dir(
    fs: &dyn FileSystem,
    dir: &Path,
    names: &[String],
) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| fs.exists(path))
}

/// The site or suite config that makes `path` a suite root.
///
/// Site configs are checked first; within each list the first match wins.
pub fn dir_contains_test_suite(path: &Path, lit_config: &LitConfig) -> Option<PathBuf> {
    let fs = lit_config.fs();
    choose_config_file_from_dir(fs, path, lit_config.site_config_names())
        .or_else(|| choose_config_file_from_dir(fs, path, lit_config.config_names()))
}

/// Whether the directory at `path_in_suite` resolves to one of its own
/// ancestors.
///
/// Directory walks follow symlinks, so a link back up the tree would
/// otherwise be descended until the OS gives up.
pub fn is_directory_cycle(
    suite: &TestSuite,
    path_in_suite: &[String],
    lit_config: &LitConfig,
) -> bool {
    let fs = lit_config.fs();
    let real = fs.canonicalize(&suite.source_path(path_in_suite));
    (0..path_in_suite.len())
        .any(|depth| fs.canonicalize(&suite.source_path(&path_in_suite[..depth])) == real)
}
