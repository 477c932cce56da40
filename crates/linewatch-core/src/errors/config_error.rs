//! Configuration errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while loading or validating configuration.
/// Construction of every component fails fast with one of these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Name of the offending field, if the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationFailed { field, .. } | Self::InvalidValue { field, .. } => Some(field),
            Self::FileNotFound { .. } | Self::ParseError { .. } => None,
        }
    }
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
