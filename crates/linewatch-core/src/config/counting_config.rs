//! Counting line configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ACCEPTED_CLASSES, DEFAULT_LINE_OFFSET, DEFAULT_LINE_POSITION, DEFAULT_MIN_CONFIDENCE,
};
use crate::errors::ConfigError;
use crate::types::VehicleClass;

/// How an observation inside the band is turned into a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingRule {
    /// Band membership alone.
    Band,
    /// Band membership on first sighting, afterwards the centre must also
    /// have reached or passed the line since the previous sighting. A track
    /// seen in the band short of the line counts when it next shows up past
    /// the line, even outside the band.
    #[default]
    LineInBand,
    /// Only tracks first seen on the approach side and now on or past the line.
    Directional,
}

impl std::str::FromStr for CrossingRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "band" => Ok(Self::Band),
            "line_in_band" => Ok(Self::LineInBand),
            "directional" => Ok(Self::Directional),
            other => Err(format!("unknown crossing rule '{other}'")),
        }
    }
}

/// Direction of travel counted by [`CrossingRule::Directional`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingDirection {
    /// Top of the frame towards the bottom (increasing y).
    #[default]
    Downward,
    Upward,
}

/// Configuration for the crossing detector.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CountingConfig {
    /// Line position as a fraction of frame height. Default: 0.6.
    pub line_position: Option<f64>,
    /// Band half-width in pixels. Default: 30.
    pub line_offset: Option<u32>,
    /// Tracker class ids to count. Default: car, motorcycle, bus, truck.
    pub accepted_classes: Vec<u32>,
    /// Observations below this confidence are filtered. Default: 0.0.
    pub min_confidence: Option<f32>,
    pub crossing_rule: Option<CrossingRule>,
    pub direction: Option<CrossingDirection>,
    /// Evict track state unseen for this long. Unset keeps every track.
    pub track_ttl_seconds: Option<f64>,
}

impl CountingConfig {
    pub fn effective_line_position(&self) -> f64 {
        self.line_position.unwrap_or(DEFAULT_LINE_POSITION)
    }

    pub fn effective_line_offset(&self) -> u32 {
        self.line_offset.unwrap_or(DEFAULT_LINE_OFFSET)
    }

    pub fn effective_accepted_classes(&self) -> Vec<u32> {
        if self.accepted_classes.is_empty() {
            DEFAULT_ACCEPTED_CLASSES.to_vec()
        } else {
            self.accepted_classes.clone()
        }
    }

    pub fn effective_min_confidence(&self) -> f32 {
        self.min_confidence.unwrap_or(DEFAULT_MIN_CONFIDENCE)
    }

    pub fn effective_crossing_rule(&self) -> CrossingRule {
        self.crossing_rule.unwrap_or_default()
    }

    pub fn effective_direction(&self) -> CrossingDirection {
        self.direction.unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let position = self.effective_line_position();
        if !(0.0..=1.0).contains(&position) {
            return Err(ConfigError::validation(
                "counting.line_position",
                "must be between 0.0 and 1.0",
            ));
        }
        let min_confidence = self.effective_min_confidence();
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(ConfigError::validation(
                "counting.min_confidence",
                "must be between 0.0 and 1.0",
            ));
        }
        for class_id in &self.accepted_classes {
            if VehicleClass::from_class_id(*class_id).is_none() {
                return Err(ConfigError::validation(
                    "counting.accepted_classes",
                    format!("class id {class_id} is not a known vehicle class"),
                ));
            }
        }
        if let Some(ttl) = self.track_ttl_seconds {
            if !ttl.is_finite() || ttl <= 0.0 {
                return Err(ConfigError::validation(
                    "counting.track_ttl_seconds",
                    "must be greater than 0",
                ));
            }
        }
        Ok(())
    }
}
