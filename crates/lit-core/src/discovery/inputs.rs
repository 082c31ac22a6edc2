//! Input expansion

use super::Discovery;
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::lit_config::LitConfig;
use crate::suite::{Test, TestSuite};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Expand `@file` inputs into the paths they list.
///
/// Each non-blank line of a list file is one input, trimmed. Other inputs
/// pass through unchanged.
pub fn expand_inputs<S: AsRef<str>>(
    lit_config: &LitConfig,
    inputs: &[S],
) -> DiscoveryResult<Vec<String>> {
    let fs = lit_config.fs();
    let mut expanded = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let Some(list_file) = input.strip_prefix('@') else {
            expanded.push(input.to_string());
            continue;
        };

        let path = fs.current_dir().unwrap_or_default().join(list_file);
        let content = fs
            .read_to_string(&path)
            .map_err(|source| DiscoveryError::ListFile {
                path: PathBuf::from(list_file),
                source,
            })?;
        expanded.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    Ok(expanded)
}

impl<'a> Discovery<'a> {
    /// The suite for `input` and the tests it names.
    ///
    /// `None` when no suite contains the input; a warning has been reported.
    pub fn get_tests(&mut self, input: &str) -> Option<(Arc<TestSuite>, Vec<Test>)> {
        let lit_config = self.lit_config;
        let result = self.get_test_suite(Path::new(input));
        let Some(suite) = result.suite else {
            lit_config.warning(format!("unable to find test suite for '{input}'"));
            return None;
        };

        if lit_config.is_debug() {
            lit_config.note(format!("resolved input '{}' to '{}'", input, suite.name()));
        }

        let tests = self.get_tests_in_suite(&suite, &result.path_in_suite);
        Some((suite, tests))
    }
}

/// Find the suites and tests named by `inputs`.
///
/// Inputs that resolve to nothing are reported as warnings and skipped. If
/// any config failed to load along the way, returns
/// [`DiscoveryError::ConfigErrors`] once every input has been processed.
pub fn try_find_tests_for_inputs<S: AsRef<str>>(
    lit_config: &LitConfig,
    inputs: &[S],
) -> DiscoveryResult<Vec<(Arc<TestSuite>, Vec<Test>)>> {
    let inputs = expand_inputs(lit_config, inputs)?;
    let mut discovery = Discovery::new(lit_config);
    let mut found = Vec::new();

    for input in &inputs {
        let Some((suite, tests)) = discovery.get_tests(input) else {
            continue;
        };
        if tests.is_empty() {
            lit_config.warning(format!("input '{input}' contained no tests"));
        }
        found.push((suite, tests));
    }

    match lit_config.num_errors() {
        0 => Ok(found),
        count => Err(DiscoveryError::ConfigErrors { count }),
    }
}

/// [`try_find_tests_for_inputs`], exiting the process with status 2 when
/// any config failed to load.
pub fn find_tests_for_inputs<S: AsRef<str>>(
    lit_config: &LitConfig,
    inputs: &[S],
) -> DiscoveryResult<Vec<(Arc<TestSuite>, Vec<Test>)>> {
    match try_find_tests_for_inputs(lit_config, inputs) {
        Err(e @ DiscoveryError::ConfigErrors { .. }) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
        other => other,
    }
}

/// Every test named by `inputs`, across all suites
pub fn load_tests<S: AsRef<str>>(lit_config: &LitConfig, inputs: &[S]) -> DiscoveryResult<Vec<Test>> {
    Ok(try_find_tests_for_inputs(lit_config, inputs)?
        .into_iter()
        .flat_map(|(_, tests)| tests)
        .collect())
}
