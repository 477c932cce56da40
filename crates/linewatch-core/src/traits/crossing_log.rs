//! CrossingLog: the contract every crossing event store satisfies.

use crate::errors::StorageError;
use crate::types::{EventId, NewCrossing, Timestamp};

/// Durable, append-only, time-queryable log of crossing events.
///
/// Implementations must make every successful `append` visible to any later
/// `count_since` issued by the same process, and must serialize concurrent
/// appends. There is deliberately no update or delete.
pub trait CrossingLog: Send + Sync {
    /// Create the underlying structures if absent. Safe to call on every start.
    fn initialize(&self) -> Result<(), StorageError>;

    /// Persist `crossing` and return its newly assigned, strictly increasing id.
    fn append(&self, crossing: &NewCrossing) -> Result<EventId, StorageError>;

    /// Number of events with `timestamp > threshold`.
    fn count_since(&self, threshold: Timestamp) -> Result<u64, StorageError>;
}

impl<T: CrossingLog + ?Sized> CrossingLog for std::sync::Arc<T> {
    fn initialize(&self) -> Result<(), StorageError> {
        (**self).initialize()
    }

    fn append(&self, crossing: &NewCrossing) -> Result<EventId, StorageError> {
        (**self).append(crossing)
    }

    fn count_since(&self, threshold: Timestamp) -> Result<u64, StorageError> {
        (**self).count_since(threshold)
    }
}
