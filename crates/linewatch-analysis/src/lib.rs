//! Per-frame analysis for linewatch.
//!
//! - [`crossing`]: turns tracker observations into at-most-once crossing candidates.
//! - [`rate`]: trailing-window traffic rate with alert cooldown.
//! - [`pipeline`]: wires both to a [`CrossingLog`](linewatch_core::traits::CrossingLog).

pub mod crossing;
pub mod pipeline;
pub mod rate;

pub use crossing::{CrossingDetector, DetectorSettings, FilterStats, FrameOutcome};
pub use pipeline::{CountingPipeline, FrameReport};
pub use rate::{AlertDecision, MonitorSettings, MonitorState, RateMonitor};
