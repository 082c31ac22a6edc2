//! CLI configuration via environment variables
//!
//! Flags given on the command line win; these only supply defaults.

use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Default to JSON listings (LIT_JSON=1)
    pub default_json: bool,
    /// Disable colored output (LIT_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Print debug notes (LIT_DEBUG=1)
    pub debug: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            default_json: flag("LIT_JSON"),
            no_color: env::var_os("LIT_NO_COLOR").is_some() || env::var_os("NO_COLOR").is_some(),
            debug: flag("LIT_DEBUG"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Set and not one of `0`, `false`, `off`
fn flag(name: &str) -> bool {
    env::var(name)
        .map(|v| {
            let lower = v.to_lowercase();
            !(lower.is_empty() || lower == "0" || lower == "false" || lower == "off")
        })
        .unwrap_or(false)
}
