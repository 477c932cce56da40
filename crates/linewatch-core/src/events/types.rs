//! Event payload types.

use serde::{Deserialize, Serialize};

use crate::types::{CrossingEvent, Timestamp};

/// Payload for `on_crossing_recorded`: a crossing that was durably appended.
#[derive(Debug, Clone)]
pub struct CrossingRecordedEvent {
    pub event: CrossingEvent,
}

/// Payload for `on_traffic_alert`. Formatting or voicing the message is the
/// sink's business.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficAlert {
    pub triggered_at: Timestamp,
    pub count: u64,
    pub threshold: u64,
}

/// Payload for `on_storage_error`.
#[derive(Debug, Clone)]
pub struct StorageErrorEvent {
    pub timestamp: Timestamp,
    pub error_code: String,
    pub message: String,
    /// Crossing candidates of the frame that were reverted.
    pub dropped_candidates: usize,
}

/// Payload for `on_observations_filtered`, emitted only when a frame
/// filtered at least one observation.
#[derive(Debug, Clone)]
pub struct ObservationsFilteredEvent {
    pub timestamp: Timestamp,
    pub class_not_accepted: usize,
    pub low_confidence: usize,
    pub invalid: usize,
}
