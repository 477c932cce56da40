//! Trailing-window traffic rate and alert cooldown.

pub mod monitor;

pub use monitor::{AlertDecision, MonitorSettings, MonitorState, RateMonitor};
