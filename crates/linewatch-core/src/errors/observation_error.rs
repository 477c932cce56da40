//! Malformed-observation errors.
//!
//! These never escape the crossing detector: it counts them per frame and
//! moves on.

use super::error_code::{self, ErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObservationError {
    #[error("track {track_id}: confidence {confidence} outside [0, 1]")]
    ConfidenceOutOfRange { track_id: i64, confidence: f32 },

    #[error("track {track_id}: non-finite center coordinate")]
    NonFiniteCoordinate { track_id: i64 },

    #[error("track {track_id}: unknown vehicle class id {class_id}")]
    UnknownClass { track_id: i64, class_id: u32 },
}

impl ErrorCode for ObservationError {
    fn error_code(&self) -> &'static str {
        error_code::INVALID_OBSERVATION
    }
}
