//! Error types for loading configurations and traces.

use std::path::PathBuf;

use magnify_core::ConfigError;
use thiserror::Error;

/// Errors surfaced to the host application.
#[derive(Error, Debug)]
pub enum MagnifyError {
    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error while reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File could not be read
    #[error("Failed to read {path:?}: {source}")]
    Read {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Configuration file written for another format version
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build understands
        expected: u32,
        /// Version found in the file
        found: u32,
    },

    /// Trace steps are not in chronological order
    #[error("Trace step {index} at {at_ms}ms is earlier than the step before it")]
    TraceOutOfOrder {
        /// Zero-based step index
        index: usize,
        /// Timestamp of the offending step
        at_ms: u64,
    },
}

impl MagnifyError {
    /// Create a read error for a path.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MagnifyError>;
