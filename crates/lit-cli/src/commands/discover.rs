//! Discover command - find suites and tests

use super::ColorOverride;
use anyhow::Result;
use colored::*;
use lit_core::path_utils::real_path;
use lit_core::{find_tests_for_inputs, LitConfig, Param, SubdirWalk, Test, TestSuite};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Arguments for the discover command
#[derive(Debug, Default)]
pub struct DiscoverArgs {
    pub inputs: Vec<String>,
    pub show_suites: bool,
    pub show_tests: bool,
    pub json: bool,
    pub params: Vec<(String, String)>,
    pub config_map: Vec<(String, String)>,
    pub all_subdirs: bool,
    pub debug: bool,
    pub quiet: bool,
    pub no_color: bool,
}

/// Run the discover command, returning the process exit code
pub fn run(args: DiscoverArgs) -> Result<i32> {
    let _color = ColorOverride::disable_if(args.no_color);

    let lit_config = build_lit_config(&args);
    let found = find_tests_for_inputs(&lit_config, &args.inputs)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&render_json(&found))?);
    } else {
        print!("{}", render_text(&found, args.show_suites, args.show_tests));
    }

    Ok(0)
}

fn build_lit_config(args: &DiscoverArgs) -> LitConfig {
    let mut lit_config = LitConfig::new("lit")
        .with_debug(args.debug)
        .with_quiet(args.quiet)
        .with_subdir_walk(if args.all_subdirs {
            SubdirWalk::AllChildren
        } else {
            SubdirWalk::FirstChild
        });

    for (name, value) in &args.params {
        lit_config = lit_config.with_param(name.clone(), Param::Value(value.clone()));
    }

    if !args.config_map.is_empty() {
        // Keys are matched against canonical config paths.
        let map: BTreeMap<String, String> = args
            .config_map
            .iter()
            .map(|(from, to)| {
                (
                    real_path(Path::new(from)).to_string_lossy().into_owned(),
                    to.clone(),
                )
            })
            .collect();
        lit_config = lit_config.with_config_map(map);
    }

    lit_config
}

fn render_text(found: &[(Arc<TestSuite>, Vec<Test>)], show_suites: bool, show_tests: bool) -> String {
    let num_tests: usize = found.iter().map(|(_, tests)| tests.len()).sum();
    let mut out = String::new();

    if show_suites {
        out.push_str(&format!("{}\n", "-- Test Suites --".bold()));
        for (suite, tests) in found {
            out.push_str(&format!("  {} - {} tests\n", suite.name().bold(), tests.len()));
            out.push_str(&format!("    Source Root: {}\n", suite.source_root().display()));
            out.push_str(&format!("    Exec Root  : {}\n", suite.exec_root().display()));
        }
    }

    if show_tests {
        out.push_str(&format!("{}\n", "-- Available Tests --".bold()));
        let mut names: Vec<_> = found
            .iter()
            .flat_map(|(_, tests)| tests.iter().map(Test::full_name))
            .collect();
        names.sort();
        for name in names {
            out.push_str(&format!("  {name}\n"));
        }
    }

    out.push_str(&format!(
        "Found {} test{} in {} suite{}\n",
        num_tests.to_string().bold(),
        if num_tests == 1 { "" } else { "s" },
        found.len(),
        if found.len() == 1 { "" } else { "s" }
    ));
    out
}

fn render_json(found: &[(Arc<TestSuite>, Vec<Test>)]) -> serde_json::Value {
    let suites: Vec<_> = found
        .iter()
        .map(|(suite, tests)| {
            let tests: Vec<_> = tests
                .iter()
                .map(|test| {
                    serde_json::json!({
                        "name": test.full_name(),
                        "path": test.path_in_suite().join("/"),
                        "source_path": test.source_path().display().to_string(),
                        "unsupported": test.is_unsupported(),
                    })
                })
                .collect();
            serde_json::json!({
                "name": suite.name(),
                "source_root": suite.source_root().display().to_string(),
                "exec_root": suite.exec_root().display().to_string(),
                "tests": tests,
            })
        })
        .collect();

    serde_json::json!({
        "tests": found.iter().map(|(_, tests)| tests.len()).sum::<usize>(),
        "suites": suites,
    })
}
