//! Traffic alert configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ALERT_THRESHOLD, DEFAULT_COOLDOWN_SECONDS, DEFAULT_WINDOW_MINUTES};
use crate::errors::ConfigError;

/// Configuration for the rate monitor.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AlertConfig {
    /// Trailing window in minutes. Default: 1.
    pub window_minutes: Option<u32>,
    /// Crossings inside the window that trigger an alert. Default: 10.
    pub threshold: Option<u64>,
    /// Minimum spacing between alerts in seconds. Default: 10.
    pub cooldown_seconds: Option<f64>,
}

impl AlertConfig {
    pub fn effective_window_minutes(&self) -> u32 {
        self.window_minutes.unwrap_or(DEFAULT_WINDOW_MINUTES)
    }

    pub fn effective_threshold(&self) -> u64 {
        self.threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD)
    }

    pub fn effective_cooldown_seconds(&self) -> f64 {
        self.cooldown_seconds.unwrap_or(DEFAULT_COOLDOWN_SECONDS)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.effective_window_minutes() == 0 {
            return Err(ConfigError::validation(
                "alert.window_minutes",
                "must be greater than 0",
            ));
        }
        if self.effective_threshold() == 0 {
            return Err(ConfigError::validation(
                "alert.threshold",
                "must be greater than 0",
            ));
        }
        let cooldown = self.effective_cooldown_seconds();
        if !cooldown.is_finite() || cooldown < 0.0 {
            return Err(ConfigError::validation(
                "alert.cooldown_seconds",
                "must be a finite, non-negative number",
            ));
        }
        Ok(())
    }
}
