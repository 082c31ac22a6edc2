//! Test enumeration within a suite

use super::{
    dir_contains_test_suite, get_local_config, is_directory_cycle, Discovery, SuiteSearchResult,
};
use crate::lit_config::SubdirWalk;
use crate::suite::{Test, TestSuite};
use crate::testing_config::TestingConfig;
use std::sync::Arc;

/// Build and VCS directories never searched for tests
pub const IGNORED_NAMES: [&str; 3] = ["Output", ".svn", ".git"];

/// Whether a directory entry named `name` is skipped under `config`
pub fn is_ignored_entry(name: &str, config: &TestingConfig) -> bool {
    IGNORED_NAMES.contains(&name) || config.excludes.contains(name)
}

impl<'a> Discovery<'a> {
    /// List the tests at `path_in_suite`.
    ///
    /// A missing path yields no tests. A file is a single test. A directory
    /// whose local config has a format is listed by that format; otherwise
    /// its subdirectories are walked, handing off to any nested suite found
    /// along the way.
    pub fn get_tests_in_suite(
        &mut self,
        suite: &Arc<TestSuite>,
        path_in_suite: &[String],
    ) -> Vec<Test> {
        let lit_config = self.lit_config;
        let fs = lit_config.fs();
        let source_path = suite.source_path(path_in_suite);

        if !fs.exists(&source_path) {
            return Vec::new();
        }

        if !fs.is_dir(&source_path) {
            let parent = &path_in_suite[..path_in_suite.len().saturating_sub(1)];
            let config = get_local_config(suite, lit_config, parent);
            return vec![Test::new(
                Arc::clone(suite),
                path_in_suite.to_vec(),
                config,
            )];
        }

        let local_config = get_local_config(suite, lit_config, path_in_suite);
        if let Some(format) = local_config.test_format() {
            return format.list_tests_in_directory(suite, path_in_suite, lit_config, &local_config);
        }

        let names = match fs.read_dir(&source_path) {
            Ok(names) => names,
            Err(e) => {
                lit_config.warning(format!(
                    "unable to list {}: {}",
                    source_path.display(),
                    e
                ));
                return Vec::new();
            }
        };

        let mut tests = Vec::new();
        for name in names {
            if is_ignored_entry(&name, &local_config) {
                continue;
            }

            let mut child = path_in_suite.to_vec();
            child.push(name);
            let child_source = suite.source_path(&child);
            if !fs.is_dir(&child_source) {
                continue;
            }
            if is_directory_cycle(suite, &child, lit_config) {
                lit_config.note(format!("skipping {}: symlink loop", child_source.display()));
                continue;
            }

            // The exec side wins so a build tree can override its sources.
            let child_exec = suite.exec_path(&child);
            let nested = if dir_contains_test_suite(&child_exec, lit_config).is_some() {
                self.get_test_suite(&child_exec)
            } else if dir_contains_test_suite(&child_source, lit_config).is_some() {
                self.get_test_suite(&child_source)
            } else {
                SuiteSearchResult::not_found()
            };

            let child_tests = match nested.suite {
                Some(nested_suite) if Arc::ptr_eq(&nested_suite, suite) => continue,
                Some(nested_suite) => {
                    self.get_tests_in_suite(&nested_suite, &nested.path_in_suite)
                }
                None => self.get_tests_in_suite(suite, &child),
            };

            match lit_config.subdir_walk() {
                SubdirWalk::FirstChild => return child_tests,
                SubdirWalk::AllChildren => tests.extend(child_tests),
            }
        }

        tests
    }
}
