//! Exec command - run one command with a deadline

use super::ColorOverride;
use anyhow::{Context, Result};
use colored::*;
use lit_core::{execute_command, ExecError, ExecOptions, RunCmdResult};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

/// Exit code for a command that overran its deadline
pub const TIMEOUT_EXIT_CODE: i32 = 124;
/// Exit code for a command stopped by SIGINT
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Arguments for the exec command
#[derive(Debug, Default)]
pub struct ExecArgs {
    pub command: Vec<String>,
    pub timeout_ms: i64,
    pub cwd: Option<PathBuf>,
    /// Added to the inherited environment
    pub env: Vec<(String, String)>,
    pub stdin: Option<String>,
    pub no_color: bool,
}

/// Run the exec command, returning the process exit code
pub fn run(args: ExecArgs) -> Result<i32> {
    let _color = ColorOverride::disable_if(args.no_color);

    let options = build_options(&args);
    let code = match execute_command(&args.command, &options) {
        Ok(result) => {
            forward(&result)?;
            result.exit_code
        }
        Err(ExecError::Timeout {
            timeout_ms,
            partial,
        }) => {
            forward(&partial)?;
            report(&format!("command timed out after {timeout_ms} ms"));
            TIMEOUT_EXIT_CODE
        }
        Err(ExecError::Interrupted) => {
            report("command was interrupted");
            INTERRUPTED_EXIT_CODE
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to execute '{}'", args.command.join(" ")))
        }
    };

    // Signal deaths are negative; report them the way shells do.
    Ok(if code < 0 { 128 - code } else { code })
}

fn build_options(args: &ExecArgs) -> ExecOptions {
    let mut options = ExecOptions::new().with_timeout_ms(args.timeout_ms);
    if let Some(cwd) = &args.cwd {
        options = options.with_cwd(cwd);
    }
    if let Some(stdin) = &args.stdin {
        options = options.with_stdin(stdin.clone());
    }
    if !args.env.is_empty() {
        let mut env = inherited_env(std::env::vars_os());
        env.extend(args.env.iter().cloned());
        options = options.with_env(env);
    }
    options
}

/// Inherited variables that are valid UTF-8; the rest are dropped.
fn inherited_env(vars: impl Iterator<Item = (OsString, OsString)>) -> BTreeMap<String, String> {
    vars.filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

fn forward(result: &RunCmdResult) -> Result<()> {
    std::io::stdout().write_all(result.stdout.as_bytes())?;
    std::io::stdout().flush()?;
    std::io::stderr().write_all(result.stderr.as_bytes())?;
    Ok(())
}

fn report(message: &str) {
    eprintln!("lit: {}: {}", "error".red().bold(), message);
}
