//! Error types for the spec relay
//!
//! Lifecycle callbacks never fail; they recover locally. The errors here
//! come from the stack reconciler, configuration loading, and replay files.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the spec relay
#[derive(Error, Debug)]
pub enum Error {
    // === Stack Errors ===
    #[error("Call-site error carries no stack trace; it must be captured before the command runs")]
    MissingStackTrace,

    #[error("Invalid stack filter pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === Replay Errors ===
    #[error("Invalid replay scenario: {0}")]
    Scenario(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid pattern error from a regex compile failure
    pub fn invalid_pattern(pattern: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a file read error for the given path
    pub fn file_read(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}
