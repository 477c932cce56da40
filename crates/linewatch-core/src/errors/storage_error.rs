//! Storage errors.

use super::error_code::{self, ErrorCode};

/// Errors from the crossing event store.
///
/// `Unavailable` covers every failed read or write of the backing medium and
/// is always propagated to the caller, never swallowed.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("stored record is corrupt: {details}")]
    Corrupt { details: String },
}

impl StorageError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => error_code::STORAGE_UNAVAILABLE,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::Corrupt { .. } => error_code::STORAGE_CORRUPT,
        }
    }
}
