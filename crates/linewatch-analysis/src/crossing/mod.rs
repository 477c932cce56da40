//! Line crossing detection.

pub mod band;
pub mod detector;
pub mod track_state;

pub use band::{CountingLine, LineSide};
pub use detector::{CrossingDetector, DetectorSettings, FilterStats, FrameOutcome};
pub use track_state::{CountState, TrackState};
