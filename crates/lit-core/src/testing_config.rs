//! Per-suite and per-directory test configuration
//!
//! A suite's root config is built from defaults and loaded from its config
//! file. A local config is a clone of the nearest ancestor's config with a
//! local config file applied on top; the ancestor is never modified.

use crate::format::{format_from_spec, TestFormat};
use crate::lit_config::LitConfig;
use crate::path_utils::normalize_lexically;
use lit_config::{ConfigFile, FormatSpec};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// How many config files a `load` chain may pull in before it is treated as a cycle
const MAX_LOAD_DEPTH: usize = 16;

/// Effective configuration at some point in a suite
#[derive(Debug, Clone)]
pub struct TestingConfig {
    pub name: String,
    pub suffixes: Vec<String>,
    pub excludes: BTreeSet<String>,
    pub available_features: BTreeSet<String>,
    pub environment: BTreeMap<String, String>,
    pub test_source_root: Option<PathBuf>,
    pub test_exec_root: Option<PathBuf>,
    pub test_format: Option<Arc<dyn TestFormat>>,
    pub unsupported: bool,
}

impl TestingConfig {
    /// Defaults for a freshly discovered suite
    pub fn from_defaults(_lit_config: &LitConfig) -> Self {
        let mut environment = BTreeMap::new();
        if let Ok(path) = std::env::var("PATH") {
            environment.insert("PATH".to_string(), path);
        }

        Self {
            name: "<unnamed>".to_string(),
            suffixes: Vec::new(),
            excludes: BTreeSet::new(),
            available_features: BTreeSet::new(),
            environment,
            test_source_root: None,
            test_exec_root: None,
            test_format: None,
            unsupported: false,
        }
    }

    pub fn test_format(&self) -> Option<&Arc<dyn TestFormat>> {
        self.test_format.as_ref()
    }

    /// Load a config file into this config.
    ///
    /// Problems are reported through `lit_config` and counted as errors; the
    /// config keeps whatever was applied before the failure.
    pub fn load_from_path(&mut self, path: &Path, lit_config: &LitConfig) {
        self.load_chain(path, lit_config, 0);
    }

    fn load_chain(&mut self, path: &Path, lit_config: &LitConfig, depth: usize) {
        if depth >= MAX_LOAD_DEPTH {
            lit_config.error(format!(
                "too many nested config loads (last was {})",
                path.display()
            ));
            return;
        }

        let content = match lit_config.fs().read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                lit_config.error(format!(
                    "unable to load config from {}: {}",
                    path.display(),
                    e
                ));
                return;
            }
        };

        let file = match ConfigFile::parse(&content, path) {
            Ok(file) => file,
            Err(e) => {
                lit_config.error(e.to_string());
                return;
            }
        };

        let config_dir = path.parent().unwrap_or_else(|| Path::new(""));
        self.apply(&file, config_dir);

        if lit_config.is_debug() {
            lit_config.note(format!("... loaded config {}", path.display()));
        }

        if let Some(next) = &file.load {
            let next = normalize_lexically(&ConfigFile::resolve_path(config_dir, next));
            self.load_chain(&next, lit_config, depth + 1);
        }
    }

    /// Apply the keys present in `file`; paths resolve against `config_dir`
    pub fn apply(&mut self, file: &ConfigFile, config_dir: &Path) {
        if let Some(name) = &file.name {
            self.name = name.clone();
        }
        if let Some(root) = &file.test_source_root {
            self.test_source_root = Some(normalize_lexically(&ConfigFile::resolve_path(
                config_dir, root,
            )));
        }
        if let Some(root) = &file.test_exec_root {
            self.test_exec_root = Some(normalize_lexically(&ConfigFile::resolve_path(
                config_dir, root,
            )));
        }
        if let Some(suffixes) = &file.suffixes {
            self.suffixes = suffixes.clone();
        }
        if let Some(excludes) = &file.excludes {
            self.excludes = excludes.iter().cloned().collect();
        }
        self.excludes.extend(file.extra_excludes.iter().cloned());
        if let Some(features) = &file.available_features {
            self.available_features = features.iter().cloned().collect();
        }
        if let Some(unsupported) = file.unsupported {
            self.unsupported = unsupported;
        }
        self.environment.extend(
            file.environment
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        match &file.format {
            Some(FormatSpec::None) => self.test_format = None,
            Some(spec) => self.test_format = format_from_spec(spec),
            None => {}
        }
    }
}
