//! Error types for fleet-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fleet-core
#[derive(Debug, Error)]
pub enum Error {
    /// Whole-table read against a file that does not exist
    #[error("table file '{0}' not found")]
    NotFound(PathBuf),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing or emission error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The device bridge tool could not be invoked or misbehaved.
    /// Caught at the DeviceSource boundary and logged, never propagated.
    #[error("device tool failed: {0}")]
    ToolInvocation(String),

    /// A path given for cookie import has no filename component
    #[error("not a cookie file path: {0}")]
    InvalidCookiePath(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
