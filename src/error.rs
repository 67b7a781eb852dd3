//! Structured error handling for the lookout session core
//!
//! Every failure mode that can abort a start attempt or degrade a running
//! session has a dedicated variant, so callers can restore UI affordances
//! instead of being left in an ambiguous half-running state.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the lookout session core
#[derive(Error, Debug)]
pub enum LookoutError {
    // Capture errors
    #[error("Capture source failed to open: {0}")]
    CaptureOpenFailed(String),

    // Detector errors
    #[error("Model loading failed: {0}")]
    ModelLoadFailed(PathBuf),

    // Class-name list errors
    #[error("Class name file not readable: {path}")]
    ClassNamesLoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Class name file contains no labels: {0}")]
    ClassNamesEmpty(PathBuf),

    // Session lifecycle errors
    #[error("A processing session is already running")]
    SessionAlreadyRunning,

    #[error("Worker thread did not report startup within {waited_ms}ms")]
    WorkerStartTimeout { waited_ms: u64 },

    #[error("Worker thread did not shut down within {waited_ms}ms")]
    WorkerShutdownTimeout { waited_ms: u64 },

    // Configuration errors
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Configuration parsing failed: {0}")]
    ConfigParseError(String),

    #[error("Invalid configuration value: {field} = {value}")]
    InvalidConfigValue { field: String, value: String },

    // Generic errors for compatibility
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Result type alias for convenience
pub type LookoutResult<T> = std::result::Result<T, LookoutError>;

impl From<std::io::Error> for LookoutError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => {
                LookoutError::Unexpected(format!("File not found: {}", err))
            }
            _ => LookoutError::Unexpected(format!("I/O error: {}", err)),
        }
    }
}

impl From<toml::de::Error> for LookoutError {
    fn from(err: toml::de::Error) -> Self {
        LookoutError::ConfigParseError(err.to_string())
    }
}

impl From<crate::config::ConfigError> for LookoutError {
    fn from(err: crate::config::ConfigError) -> Self {
        match err {
            crate::config::ConfigError::FileReadError(path, _) => {
                LookoutError::ConfigNotFound(path)
            }
            crate::config::ConfigError::InvalidValue(msg) => LookoutError::InvalidConfigValue {
                field: "config".to_string(),
                value: msg,
            },
            other => LookoutError::ConfigParseError(other.to_string()),
        }
    }
}
