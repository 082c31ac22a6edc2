use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

/// lit test runner: suite discovery and command execution.
///
/// Suites are directories holding a `lit.site.toml` or `lit.toml`.
/// Directories inside a suite may adjust its settings with `lit.local.toml`.
///
/// EXAMPLES:
///     lit discover tests/                 Summarize the suites under tests/
///     lit discover tests/ --show-tests    List every discovered test
///     lit discover @inputs.txt --json     Discover from a list file as JSON
///     lit exec --timeout 500 -- ./a.out   Run a command with a deadline
///
/// ENVIRONMENT VARIABLES:
///     LIT_JSON       Set to '1' for JSON output by default
///     LIT_DEBUG      Set to '1' to print debug notes
///     NO_COLOR       Set to disable colored output
#[derive(Parser)]
#[command(name = "lit")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover test suites and tests
    ///
    /// Each input is a path inside a suite, or `@FILE` naming a file that
    /// lists one input per line. Exits with status 2 if any config file
    /// failed to load.
    ///
    /// EXAMPLES:
    ///     lit discover tests/unit                 Discover one directory
    ///     lit discover tests/a.txt                Resolve a single test
    ///     lit discover tests -D build_mode=debug  Pass a parameter
    #[command(visible_alias = "d")]
    Discover {
        /// Paths or @list files to discover
        #[arg(required = true)]
        inputs: Vec<String>,
        /// List each suite with its roots and test count
        #[arg(long)]
        show_suites: bool,
        /// List every test
        #[arg(long)]
        show_tests: bool,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Define a parameter (NAME=VALUE)
        #[arg(short = 'D', long = "param", value_name = "NAME=VALUE", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        /// Load the config at TO wherever the config at FROM is found
        #[arg(long, value_name = "FROM=TO", value_parser = parse_key_val)]
        config_map: Vec<(String, String)>,
        /// Walk every subdirectory instead of stopping at the first one
        #[arg(long)]
        all_subdirs: bool,
        /// Print debug notes
        #[arg(long)]
        debug: bool,
        /// Suppress warnings
        #[arg(long, short = 'q')]
        quiet: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Run a command with an optional deadline
    ///
    /// The command's output is forwarded and its exit code returned. A
    /// command that overruns its deadline exits with 124, one stopped by
    /// SIGINT with 130.
    ///
    /// EXAMPLES:
    ///     lit exec -- echo hello
    ///     lit exec --timeout 1000 --cwd build -- ./unit-tests
    ///     lit exec --env MODE=fast --stdin "input" -- ./filter
    #[command(visible_alias = "x")]
    Exec {
        /// Deadline in milliseconds; 0 disables it
        #[arg(long, short = 't', default_value_t = 0, allow_negative_numbers = true)]
        timeout: i64,
        /// Working directory for the command
        #[arg(long)]
        cwd: Option<PathBuf>,
        /// Set an environment variable (KEY=VALUE)
        #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        env: Vec<(String, String)>,
        /// Text to write to the command's stdin
        #[arg(long)]
        stdin: Option<String>,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
        /// Command and arguments
        #[arg(required = true, last = true)]
        command: Vec<String>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();

    let code = match cli.command {
        Commands::Discover {
            inputs,
            show_suites,
            show_tests,
            json,
            params,
            config_map,
            all_subdirs,
            debug,
            quiet,
            no_color,
        } => {
            // Command-line flag overrides environment variable
            let args = commands::discover::DiscoverArgs {
                inputs,
                show_suites,
                show_tests,
                json: json || cli_config.default_json,
                params,
                config_map,
                all_subdirs,
                debug: debug || cli_config.debug,
                quiet,
                no_color: no_color || cli_config.no_color,
            };
            commands::discover::run(args)?
        }
        Commands::Exec {
            timeout,
            cwd,
            env,
            stdin,
            no_color,
            command,
        } => {
            let args = commands::exec::ExecArgs {
                command,
                timeout_ms: timeout,
                cwd,
                env,
                stdin,
                no_color: no_color || cli_config.no_color,
            };
            commands::exec::run(args)?
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
