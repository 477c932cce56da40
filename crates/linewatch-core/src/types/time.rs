//! Capture timestamps as seconds since the Unix epoch.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Capture time of a frame, in (fractional) seconds since the Unix epoch.
///
/// Stored verbatim in the `timestamp REAL` column, so windowed counts are
/// plain float comparisons.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub f64);

impl Timestamp {
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_micros() as f64 / 1_000_000.0)
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// `None` for non-finite or out-of-range values.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if !self.0.is_finite() {
            return None;
        }
        let micros = (self.0 * 1_000_000.0).round();
        if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
            return None;
        }
        Utc.timestamp_micros(micros as i64).single()
    }

    pub fn minus_secs(self, secs: f64) -> Self {
        Self(self.0 - secs)
    }

    pub fn plus_secs(self, secs: f64) -> Self {
        Self(self.0 + secs)
    }

    /// Seconds elapsed from `earlier` to `self` (negative if `earlier` is later).
    pub fn secs_since(self, earlier: Timestamp) -> f64 {
        self.0 - earlier.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<f64> for Timestamp {
    fn from(secs: f64) -> Self {
        Self(secs)
    }
}
