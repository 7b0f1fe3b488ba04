//! Configuration error model.

use thiserror::Error;

/// Result type used by configuration loaders.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration-level error.
///
/// Raised when an explicitly requested value is invalid. Values read from the
/// environment fall back to defaults instead (see [`crate::config`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value failed validation (e.g. a zero interval).
    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    /// No usable data directory could be resolved.
    #[error("could not resolve an application data directory")]
    NoDataDir,
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }
}
