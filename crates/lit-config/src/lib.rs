//! lit Configuration Files
//!
//! Provides the on-disk format for test suite configuration:
//! - Site configs (`lit.site.toml`), usually generated next to build output
//! - Suite configs (`lit.toml`), marking the root of a test suite
//! - Local configs (`lit.local.toml`), overriding settings for one subtree
//!
//! All three share one schema, [`ConfigFile`]. Which files are searched for,
//! and in which order, is described by [`ConfigNames`].
//!
//! # Example
//!
//! ```no_run
//! use lit_config::ConfigFile;
//! use std::path::Path;
//!
//! let file = ConfigFile::load_from_file(Path::new("test/lit.toml")).unwrap();
//! println!("{:?}", file.name);
//! ```

pub mod file;
pub mod names;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}' in {file}: {reason}")]
    InvalidValue {
        field: String,
        file: PathBuf,
        reason: String,
    },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use file::{ConfigFile, FormatSpec};
pub use names::ConfigNames;
