//! Suite, site and local configuration files
//!
//! Every key is optional. A file only overrides what it names; anything it
//! leaves out is inherited from the configuration it is loaded into.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Contents of one `lit.toml`, `lit.site.toml` or `lit.local.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Suite name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Source root of the suite (relative to the config file's directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_source_root: Option<PathBuf>,

    /// Exec root of the suite (relative to the config file's directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_exec_root: Option<PathBuf>,

    /// Test file suffixes, replacing the inherited list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffixes: Option<Vec<String>>,

    /// Excluded basenames, replacing the inherited set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excludes: Option<Vec<String>>,

    /// Excluded basenames added to the inherited set
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_excludes: Vec<String>,

    /// Features available to tests, replacing the inherited set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_features: Option<Vec<String>>,

    /// Marks every test below this point as unsupported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsupported: Option<bool>,

    /// Environment variables merged over the inherited environment
    #[serde(default)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,

    /// Test format used to list tests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatSpec>,

    /// Another config file to load after this one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<PathBuf>,
}

/// Test format selection (`[format]` table)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case", deny_unknown_fields)]
pub enum FormatSpec {
    /// Files matching the configured suffixes are tests
    Suffix,

    /// Executables under the exec root are tests
    Executable {
        #[serde(default)]
        #[serde(skip_serializing_if = "Vec::is_empty")]
        suffixes: Vec<String>,
    },

    /// Clear an inherited format and fall back to the directory walk
    None,
}

impl ConfigFile {
    /// Load and validate a config file from disk
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        Self::parse(&content, path)
    }

    /// Parse and validate config file contents
    ///
    /// `path` is only used for error reporting.
    pub fn parse(content: &str, path: &Path) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate(path)?;
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self, path: &Path) -> ConfigResult<()> {
        let invalid = |field: &str, reason: String| ConfigError::InvalidValue {
            field: field.to_string(),
            file: path.to_path_buf(),
            reason,
        };

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(invalid("name", "name cannot be empty".to_string()));
            }
        }

        if let Some(suffixes) = &self.suffixes {
            validate_suffixes("suffixes", suffixes).map_err(|r| invalid("suffixes", r))?;
        }

        if let Some(FormatSpec::Executable { suffixes }) = &self.format {
            validate_suffixes("format.suffixes", suffixes)
                .map_err(|r| invalid("format.suffixes", r))?;
        }

        for (field, names) in [
            ("excludes", self.excludes.as_deref().unwrap_or_default()),
            ("extra_excludes", self.extra_excludes.as_slice()),
        ] {
            for name in names {
                if !is_valid_basename(name) {
                    return Err(invalid(
                        field,
                        format!("'{}' must be a plain file or directory name", name),
                    ));
                }
            }
        }

        for key in self.environment.keys() {
            if key.is_empty() || key.contains('=') {
                return Err(invalid(
                    "environment",
                    format!("invalid variable name '{}'", key),
                ));
            }
        }

        if let Some(load) = &self.load {
            if load.as_os_str().is_empty() {
                return Err(invalid("load", "path cannot be empty".to_string()));
            }
        }

        Ok(())
    }

    /// Resolve a path named in this file against the file's directory
    pub fn resolve_path(config_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            config_dir.join(path)
        }
    }
}

fn validate_suffixes(field: &str, suffixes: &[String]) -> Result<(), String> {
    if suffixes.iter().any(|s| s.is_empty()) {
        return Err(format!("{} cannot contain an empty suffix", field));
    }
    Ok(())
}

/// A basename is non-empty, not `.`/`..`, and has no path separators
fn is_valid_basename(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
