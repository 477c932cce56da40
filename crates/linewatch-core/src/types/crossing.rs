//! Crossing events: candidates from the detector and persisted records.

use serde::{Deserialize, Serialize};

use super::observation::TrackId;
use super::time::Timestamp;
use super::vehicle::VehicleClass;

/// Store-assigned, monotonically increasing event id.
pub type EventId = i64;

/// A crossing produced by the detector, not yet persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewCrossing {
    pub timestamp: Timestamp,
    pub vehicle_class: VehicleClass,
    pub track_id: TrackId,
    pub confidence: f32,
}

impl NewCrossing {
    /// Attach the id assigned by the store.
    pub fn with_id(self, event_id: EventId) -> CrossingEvent {
        CrossingEvent {
            event_id,
            timestamp: self.timestamp,
            vehicle_class: self.vehicle_class,
            track_id: self.track_id,
            confidence: self.confidence,
        }
    }
}

/// An appended crossing event. Immutable once stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossingEvent {
    pub event_id: EventId,
    pub timestamp: Timestamp,
    pub vehicle_class: VehicleClass,
    pub track_id: TrackId,
    pub confidence: f32,
}
