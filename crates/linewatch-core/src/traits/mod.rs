//! Trait seams between the analysis and storage layers.

pub mod crossing_log;

pub use crossing_log::CrossingLog;
