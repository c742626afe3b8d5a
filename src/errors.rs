// src/errors.rs

//! Crate-wide error type and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitepipeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Environment precondition that failed before any process was spawned
    /// (missing working directory, missing input file).
    #[error("{0}")]
    Precondition(String),

    #[error("process '{command}' exited with code {exit_code}{}", preview_suffix(.preview))]
    ProcessFailed {
        command: String,
        exit_code: i32,
        preview: Option<String>,
    },

    #[error("failed to start '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },

    #[error("process '{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    /// A downstream collaborator (auditor, optimizer, ...) reported failure.
    #[error("{0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SitepipeError {
    pub fn config(msg: impl Into<String>) -> Self {
        SitepipeError::ConfigError(msg.into())
    }

    /// Whether a step's `allowFailure` flag may downgrade this error into a
    /// tolerated outcome. Timeouts, configuration and precondition errors
    /// are never tolerated.
    pub fn is_tolerable(&self) -> bool {
        matches!(
            self,
            SitepipeError::ProcessFailed { .. }
                | SitepipeError::SpawnFailed { .. }
                | SitepipeError::TaskFailed(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SitepipeError::Timeout { .. })
    }
}

fn preview_suffix(preview: &Option<String>) -> String {
    match preview {
        Some(p) => format!(": {p}"),
        None => String::new(),
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SitepipeError>;
