//! Stable error codes for logs and CLI output.

/// Every error enum maps onto a stable, machine-readable code.
pub trait ErrorCode {
    /// Returns the code string (e.g., "STORAGE_UNAVAILABLE").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_UNAVAILABLE: &str = "STORAGE_UNAVAILABLE";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const STORAGE_CORRUPT: &str = "STORAGE_CORRUPT";
pub const INVALID_OBSERVATION: &str = "INVALID_OBSERVATION";
