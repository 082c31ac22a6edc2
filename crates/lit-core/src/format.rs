//! Test formats
//!
//! A format decides which entries of a directory are tests. When a local
//! config carries a format, discovery hands the whole directory to it and
//! returns its result as-is.

use crate::discovery::{
    dir_contains_test_suite, get_local_config, is_directory_cycle, is_ignored_entry,
};
use crate::lit_config::LitConfig;
use crate::path_utils::{is_executable, listdir_files};
use crate::suite::{Test, TestSuite};
use crate::testing_config::TestingConfig;
use lit_config::FormatSpec;
use std::fmt;
use std::path::Component;
use std::sync::Arc;

/// Lists the tests in one directory of a suite
pub trait TestFormat: fmt::Debug + Send + Sync {
    /// Short name used in listings
    fn name(&self) -> &'static str;

    fn list_tests_in_directory(
        &self,
        suite: &Arc<TestSuite>,
        path_in_suite: &[String],
        lit_config: &LitConfig,
        local_config: &Arc<TestingConfig>,
    ) -> Vec<Test>;
}

/// Build the format named by a config file's `[format]` table
pub fn format_from_spec(spec: &FormatSpec) -> Option<Arc<dyn TestFormat>> {
    match spec {
        FormatSpec::Suffix => Some(Arc::new(SuffixFormat)),
        FormatSpec::Executable { suffixes } => Some(Arc::new(ExecutableFormat {
            suffixes: suffixes.clone(),
        })),
        FormatSpec::None => None,
    }
}

/// Files whose names end in one of the local config's suffixes are tests.
///
/// Subdirectories are descended with their own local config. Directories
/// holding their own suite or site config are nested suites and are left
/// to be discovered on their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuffixFormat;

impl TestFormat for SuffixFormat {
    fn name(&self) -> &'static str {
        "suffix"
    }

    fn list_tests_in_directory(
        &self,
        suite: &Arc<TestSuite>,
        path_in_suite: &[String],
        lit_config: &LitConfig,
        local_config: &Arc<TestingConfig>,
    ) -> Vec<Test> {
        let fs = lit_config.fs();
        let source_dir = suite.source_path(path_in_suite);
        let names = match fs.read_dir(&source_dir) {
            Ok(names) => names,
            Err(e) => {
                lit_config.warning(format!(
                    "unable to list {}: {}",
                    source_dir.display(),
                    e
                ));
                return Vec::new();
            }
        };

        let mut tests = Vec::new();
        let mut subdirs = Vec::new();
        for name in names {
            if name.starts_with('.') || is_ignored_entry(&name, local_config) {
                continue;
            }

            let mut path = path_in_suite.to_vec();
            path.push(name);
            if fs.is_dir(&suite.source_path(&path)) {
                subdirs.push(path);
                continue;
            }

            let file_name = path.last().map(String::as_str).unwrap_or_default();
            if local_config
                .suffixes
                .iter()
                .any(|suffix| file_name.ends_with(suffix.as_str()))
            {
                tests.push(Test::new(suite.clone(), path, local_config.clone()));
            }
        }

        for path in subdirs {
            if is_directory_cycle(suite, &path, lit_config) {
                lit_config.note(format!(
                    "skipping {}: symlink loop",
                    suite.source_path(&path).display()
                ));
                continue;
            }
            if dir_contains_test_suite(&suite.exec_path(&path), lit_config).is_some()
                || dir_contains_test_suite(&suite.source_path(&path), lit_config).is_some()
            {
                continue;
            }

            let sub_config = get_local_config(suite, lit_config, &path);
            if let Some(format) = sub_config.test_format() {
                tests.extend(format.list_tests_in_directory(suite, &path, lit_config, &sub_config));
            }
        }

        tests
    }
}

/// Executable files under the exec directory are tests.
///
/// Build products are only ever on disk, so this format lists the host
/// filesystem directly rather than going through the discovery filesystem.
#[derive(Debug, Default, Clone)]
pub struct ExecutableFormat {
    /// Accepted name suffixes; empty accepts every executable
    pub suffixes: Vec<String>,
}

impl TestFormat for ExecutableFormat {
    fn name(&self) -> &'static str {
        "executable"
    }

    fn list_tests_in_directory(
        &self,
        suite: &Arc<TestSuite>,
        path_in_suite: &[String],
        _lit_config: &LitConfig,
        local_config: &Arc<TestingConfig>,
    ) -> Vec<Test> {
        let exec_dir = suite.exec_path(path_in_suite);

        listdir_files(&exec_dir, &self.suffixes, &local_config.excludes)
            .into_iter()
            .filter(|file| is_executable(file))
            .filter_map(|file| {
                let relative = file.strip_prefix(&exec_dir).ok()?;
                let mut path = path_in_suite.to_vec();
                for component in relative.components() {
                    if let Component::Normal(name) = component {
                        path.push(name.to_string_lossy().into_owned());
                    }
                }
                Some(Test::new(suite.clone(), path, local_config.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_spec() {
        assert_eq!(format_from_spec(&FormatSpec::Suffix).unwrap().name(), "suffix");
        assert_eq!(
            format_from_spec(&FormatSpec::Executable { suffixes: vec![] })
                .unwrap()
                .name(),
            "executable"
        );
        assert!(format_from_spec(&FormatSpec::None).is_none());
    }
}
