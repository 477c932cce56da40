//! Per-frame observations produced by the external detector/tracker.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::vehicle::VehicleClass;
use crate::errors::ObservationError;

/// Tracker-assigned identity, stable while the object stays tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub i64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Axis-aligned box in pixel coordinates, serialized as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// One tracked detection in one frame. Read-only input to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub track_id: TrackId,
    /// Raw class id from the tracker (COCO numbering).
    pub class_id: u32,
    pub confidence: f32,
    /// Vertical centre of the bounding box, in pixels.
    pub center_y: f32,
}

impl Observation {
    pub fn new(track_id: i64, class_id: u32, confidence: f32, center_y: f32) -> Self {
        Self {
            track_id: TrackId(track_id),
            class_id,
            confidence,
            center_y,
        }
    }

    /// Build an observation from a tracker box; `center_y` is the box midpoint.
    pub fn from_bbox(
        track_id: i64,
        class_id: u32,
        confidence: f32,
        bbox: &BoundingBox,
    ) -> Self {
        let (_, cy) = bbox.center();
        Self::new(track_id, class_id, confidence, cy)
    }

    /// Check the fields the detector relies on and resolve the vehicle class.
    pub fn validate(&self) -> Result<VehicleClass, ObservationError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ObservationError::ConfidenceOutOfRange {
                track_id: self.track_id.0,
                confidence: self.confidence,
            });
        }
        if !self.center_y.is_finite() {
            return Err(ObservationError::NonFiniteCoordinate {
                track_id: self.track_id.0,
            });
        }
        VehicleClass::from_class_id(self.class_id).ok_or(ObservationError::UnknownClass {
            track_id: self.track_id.0,
            class_id: self.class_id,
        })
    }
}
