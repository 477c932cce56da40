//! Shared constants for linewatch.

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Counting line position as a fraction of frame height (0.6 = 60% down).
pub const DEFAULT_LINE_POSITION: f64 = 0.6;

/// Half-width of the counting band in pixels.
pub const DEFAULT_LINE_OFFSET: u32 = 30;

/// COCO class ids counted by default: car, motorcycle, bus, truck.
pub const DEFAULT_ACCEPTED_CLASSES: [u32; 4] = [2, 3, 5, 7];

/// Minimum observation confidence accepted by the crossing detector.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.0;

/// Trailing window for the traffic rate, in minutes.
pub const DEFAULT_WINDOW_MINUTES: u32 = 1;

/// Crossings inside the window that trigger an alert.
pub const DEFAULT_ALERT_THRESHOLD: u64 = 10;

/// Minimum spacing between two alerts, in seconds.
pub const DEFAULT_COOLDOWN_SECONDS: f64 = 10.0;

/// Default SQLite database file.
pub const DEFAULT_DB_PATH: &str = "traffic_data.db";

/// Number of recent events shown by `linewatch stats`.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Horizon of the per-minute flow series in the traffic summary.
pub const FLOW_HISTORY_MINUTES: u32 = 60;
