//! Run-wide settings and diagnostics
//!
//! One [`LitConfig`] is shared by every discovery call in a run. Besides the
//! settings it carries the diagnostic counters: config loading reports
//! problems here instead of returning errors, and the input expander checks
//! the error count once all inputs have been processed.

use crate::fs::{FileSystem, OsFileSystem};
use colored::*;
use lit_config::ConfigNames;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Name of the parameter holding the config path remapping table
pub const CONFIG_MAP_PARAM: &str = "config_map";

/// Value of a user-defined parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Value(String),
    Map(BTreeMap<String, String>),
}

/// How the fallback directory walk treats subdirectories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubdirWalk {
    /// Follow only the first qualifying subdirectory
    #[default]
    FirstChild,
    /// Follow every qualifying subdirectory and concatenate the results
    AllChildren,
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Note,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Note => write!(f, "note"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

/// Settings and diagnostic sink for a discovery run
pub struct LitConfig {
    prog_name: String,
    debug: bool,
    quiet: bool,
    names: ConfigNames,
    params: BTreeMap<String, Param>,
    subdir_walk: SubdirWalk,
    fs: Arc<dyn FileSystem>,
    num_errors: AtomicUsize,
    num_warnings: AtomicUsize,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl fmt::Debug for LitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LitConfig")
            .field("prog_name", &self.prog_name)
            .field("debug", &self.debug)
            .field("names", &self.names)
            .field("params", &self.params)
            .field("subdir_walk", &self.subdir_walk)
            .field("num_errors", &self.num_errors())
            .field("num_warnings", &self.num_warnings())
            .finish()
    }
}

impl Default for LitConfig {
    fn default() -> Self {
        Self::new("lit")
    }
}

impl LitConfig {
    /// Create a config using the host filesystem and default config names
    pub fn new(prog_name: impl Into<String>) -> Self {
        Self {
            prog_name: prog_name.into(),
            debug: false,
            quiet: false,
            names: ConfigNames::default(),
            params: BTreeMap::new(),
            subdir_walk: SubdirWalk::default(),
            fs: Arc::new(OsFileSystem),
            num_errors: AtomicUsize::new(0),
            num_warnings: AtomicUsize::new(0),
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    /// Print debug notes
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Suppress printing of warnings (they are still counted)
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the candidate config file names
    pub fn with_config_names(mut self, names: ConfigNames) -> Self {
        self.names = names;
        self
    }

    /// Set a user-defined parameter
    pub fn with_param(mut self, name: impl Into<String>, value: Param) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Set the config path remapping table
    pub fn with_config_map(self, map: BTreeMap<String, String>) -> Self {
        self.with_param(CONFIG_MAP_PARAM, Param::Map(map))
    }

    /// Set the fallback walk mode
    pub fn with_subdir_walk(mut self, mode: SubdirWalk) -> Self {
        self.subdir_walk = mode;
        self
    }

    /// Use a different filesystem
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn prog_name(&self) -> &str {
        &self.prog_name
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn site_config_names(&self) -> &[String] {
        &self.names.site
    }

    pub fn config_names(&self) -> &[String] {
        &self.names.suite
    }

    pub fn local_config_names(&self) -> &[String] {
        &self.names.local
    }

    pub fn params(&self) -> &BTreeMap<String, Param> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.get(name)
    }

    /// The config path remapping table, if one was given
    pub fn config_map(&self) -> Option<&BTreeMap<String, String>> {
        match self.params.get(CONFIG_MAP_PARAM) {
            Some(Param::Map(map)) => Some(map),
            _ => None,
        }
    }

    pub fn subdir_walk(&self) -> SubdirWalk {
        self.subdir_walk
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Report a debug note. Only printed in debug mode.
    pub fn note(&self, message: impl Into<String>) {
        let message = message.into();
        if self.debug {
            self.print(DiagnosticLevel::Note, &message);
        }
        self.record(DiagnosticLevel::Note, message);
    }

    /// Report a warning
    pub fn warning(&self, message: impl Into<String>) {
        let message = message.into();
        if !self.quiet {
            self.print(DiagnosticLevel::Warning, &message);
        }
        self.num_warnings.fetch_add(1, Ordering::Relaxed);
        self.record(DiagnosticLevel::Warning, message);
    }

    /// Report an error. Discovery keeps going; the error is counted.
    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        self.print(DiagnosticLevel::Error, &message);
        self.num_errors.fetch_add(1, Ordering::Relaxed);
        self.record(DiagnosticLevel::Error, message);
    }

    pub fn num_errors(&self) -> usize {
        self.num_errors.load(Ordering::Relaxed)
    }

    pub fn num_warnings(&self) -> usize {
        self.num_warnings.load(Ordering::Relaxed)
    }

    /// Every diagnostic reported so far, in order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn print(&self, level: DiagnosticLevel, message: &str) {
        let tag = match level {
            DiagnosticLevel::Note => level.to_string().cyan().bold(),
            DiagnosticLevel::Warning => level.to_string().yellow().bold(),
            DiagnosticLevel::Error => level.to_string().red().bold(),
        };
        eprintln!("{}: {}: {}", self.prog_name, tag, message);
    }

    fn record(&self, level: DiagnosticLevel, message: String) {
        self.diagnostics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Diagnostic { level, message });
    }
}
