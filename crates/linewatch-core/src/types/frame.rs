//! A frame's worth of tracker output.

use serde::{Deserialize, Serialize};

use super::observation::{BoundingBox, Observation};
use super::time::Timestamp;

/// Tracker output for one captured frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub timestamp: Timestamp,
    pub frame_height: u32,
    pub observations: Vec<Observation>,
}

impl Frame {
    pub fn new(timestamp: impl Into<Timestamp>, frame_height: u32, observations: Vec<Observation>) -> Self {
        Self {
            timestamp: timestamp.into(),
            frame_height,
            observations,
        }
    }
}

/// Wire form of one tracked box, as written by the detector process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedBox {
    pub track_id: i64,
    pub class_id: u32,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Wire form of one frame (one JSON line).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    pub timestamp: f64,
    pub frame_height: u32,
    #[serde(default)]
    pub observations: Vec<TrackedBox>,
}

impl From<FrameRecord> for Frame {
    fn from(record: FrameRecord) -> Self {
        let observations = record
            .observations
            .iter()
            .map(|b| Observation::from_bbox(b.track_id, b.class_id, b.confidence, &b.bbox))
            .collect();
        Frame::new(record.timestamp, record.frame_height, observations)
    }
}
