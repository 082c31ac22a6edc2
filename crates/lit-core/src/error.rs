/// Discovery and execution error types
use crate::exec::RunCmdResult;
use std::path::PathBuf;
use thiserror::Error;

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
pub type ExecResult<T> = Result<T, ExecError>;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("unable to read input list {path}: {source}")]
    ListFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{count} errors, exiting.")]
    ConfigErrors { count: usize },
}

/// Why a command did not produce a normal result
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("empty command")]
    EmptyCommand,

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("I/O error while running command: {0}")]
    Io(#[from] std::io::Error),

    /// The deadline passed before the command finished. Output captured up
    /// to completion is kept.
    #[error("command timed out after {timeout_ms} ms")]
    Timeout {
        timeout_ms: i64,
        partial: RunCmdResult,
    },

    #[error("command was interrupted")]
    Interrupted,
}

impl ExecError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecError::Timeout { .. })
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, ExecError::Interrupted)
    }
}
