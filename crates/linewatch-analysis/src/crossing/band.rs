//! Counting line geometry for one frame height.

use serde::{Deserialize, Serialize};

/// Where a centre point lies relative to the counting band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineSide {
    /// Not observed yet.
    #[default]
    Unknown,
    /// Above the band (smaller y).
    Above,
    InBand,
    /// Below the band (larger y).
    Below,
}

/// Horizontal counting line with an inclusive band of `offset` pixels on
/// each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountingLine {
    line_y: f64,
    offset: f64,
}

impl CountingLine {
    pub fn new(line_y: f64, offset: f64) -> Self {
        Self { line_y, offset }
    }

    /// Line at `line_position * frame_height`.
    pub fn for_frame(line_position: f64, line_offset: u32, frame_height: u32) -> Self {
        Self::new(line_position * f64::from(frame_height), f64::from(line_offset))
    }

    pub fn line_y(&self) -> f64 {
        self.line_y
    }

    pub fn band_top(&self) -> f64 {
        self.line_y - self.offset
    }

    pub fn band_bottom(&self) -> f64 {
        self.line_y + self.offset
    }

    pub fn contains(&self, center_y: f64) -> bool {
        center_y >= self.band_top() && center_y <= self.band_bottom()
    }

    pub fn side(&self, center_y: f64) -> LineSide {
        if center_y < self.band_top() {
            LineSide::Above
        } else if center_y > self.band_bottom() {
            LineSide::Below
        } else {
            LineSide::InBand
        }
    }

    /// True if moving from `previous` to `current` reaches or passes the line,
    /// in either direction.
    pub fn reached_between(&self, previous: f64, current: f64) -> bool {
        (previous <= self.line_y && current >= self.line_y)
            || (previous >= self.line_y && current <= self.line_y)
    }
}
