//! Error handling for linewatch.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod observation_error;
pub mod pipeline_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use observation_error::ObservationError;
pub use pipeline_error::PipelineError;
pub use storage_error::StorageError;
