//! Core error types for setflow-core.
//!
//! Engine operations are total and never fail; errors only arise on
//! the ambient surfaces (configuration IO, serialization).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for setflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No usable configuration directory on this platform
    #[error("No configuration directory available")]
    NoConfigDir,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambient_errors_wrap_into_core_error() {
        let err: CoreError = ConfigError::ParseFailed("bad value".into()).into();
        assert!(matches!(err, CoreError::Config(_)));
        assert!(err.to_string().contains("bad value"));

        let err: CoreError = std::io::Error::other("tick").into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
