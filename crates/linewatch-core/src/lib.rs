//! Core building blocks shared by every linewatch crate.
//!
//! Nothing in here touches SQLite or performs per-frame work; the storage and
//! analysis crates depend on these types and traits.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

pub use config::LinewatchConfig;
pub use errors::{ConfigError, PipelineError, StorageError};
pub use traits::CrossingLog;
pub use types::{CrossingEvent, EventId, Frame, NewCrossing, Observation, Timestamp, TrackId, VehicleClass};
