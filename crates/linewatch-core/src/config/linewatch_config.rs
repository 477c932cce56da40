//! Top-level linewatch configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AlertConfig, CountingConfig, CrossingRule, StorageConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up in the config root.
pub const PROJECT_CONFIG_FILE: &str = "linewatch.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`LINEWATCH_*`)
/// 3. Project config (`linewatch.toml` in the config root)
/// 4. User config (`~/.linewatch/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LinewatchConfig {
    pub counting: CountingConfig,
    pub alert: AlertConfig,
    pub storage: StorageConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db_path: Option<String>,
    pub line_position: Option<f64>,
    pub alert_threshold: Option<u64>,
    pub window_minutes: Option<u32>,
    pub cooldown_seconds: Option<f64>,
}

impl LinewatchConfig {
    /// Load configuration with layered resolution, then validate it.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %e,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.counting.validate()?;
        self.alert.validate()?;
        Ok(())
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the user config path: `~/.linewatch/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".linewatch").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are ignored.
    fn merge_toml_file(config: &mut LinewatchConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: LinewatchConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only values set in `other` override.
    fn merge(base: &mut LinewatchConfig, other: &LinewatchConfig) {
        // Counting
        let (b, o) = (&mut base.counting, &other.counting);
        if o.line_position.is_some() {
            b.line_position = o.line_position;
        }
        if o.line_offset.is_some() {
            b.line_offset = o.line_offset;
        }
        if !o.accepted_classes.is_empty() {
            b.accepted_classes = o.accepted_classes.clone();
        }
        if o.min_confidence.is_some() {
            b.min_confidence = o.min_confidence;
        }
        if o.crossing_rule.is_some() {
            b.crossing_rule = o.crossing_rule;
        }
        if o.direction.is_some() {
            b.direction = o.direction;
        }
        if o.track_ttl_seconds.is_some() {
            b.track_ttl_seconds = o.track_ttl_seconds;
        }

        // Alert
        let (b, o) = (&mut base.alert, &other.alert);
        if o.window_minutes.is_some() {
            b.window_minutes = o.window_minutes;
        }
        if o.threshold.is_some() {
            b.threshold = o.threshold;
        }
        if o.cooldown_seconds.is_some() {
            b.cooldown_seconds = o.cooldown_seconds;
        }

        // Storage
        if other.storage.db_path.is_some() {
            base.storage.db_path = other.storage.db_path.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `LINEWATCH_LINE_POSITION`, `LINEWATCH_ALERT_THRESHOLD`, etc.
    fn apply_env_overrides(config: &mut LinewatchConfig) {
        if let Some(v) = env_parse::<f64>("LINEWATCH_LINE_POSITION") {
            config.counting.line_position = Some(v);
        }
        if let Some(v) = env_parse::<u32>("LINEWATCH_LINE_OFFSET") {
            config.counting.line_offset = Some(v);
        }
        if let Ok(val) = std::env::var("LINEWATCH_ACCEPTED_CLASSES") {
            let parsed: Result<Vec<u32>, _> = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<u32>)
                .collect();
            match parsed {
                Ok(classes) if !classes.is_empty() => config.counting.accepted_classes = classes,
                _ => tracing::warn!(value = %val, "ignoring malformed LINEWATCH_ACCEPTED_CLASSES"),
            }
        }
        if let Some(v) = env_parse::<f32>("LINEWATCH_MIN_CONFIDENCE") {
            config.counting.min_confidence = Some(v);
        }
        if let Some(v) = env_parse::<CrossingRule>("LINEWATCH_CROSSING_RULE") {
            config.counting.crossing_rule = Some(v);
        }
        if let Some(v) = env_parse::<u32>("LINEWATCH_WINDOW_MINUTES") {
            config.alert.window_minutes = Some(v);
        }
        if let Some(v) = env_parse::<u64>("LINEWATCH_ALERT_THRESHOLD") {
            config.alert.threshold = Some(v);
        }
        if let Some(v) = env_parse::<f64>("LINEWATCH_COOLDOWN_SECONDS") {
            config.alert.cooldown_seconds = Some(v);
        }
        if let Ok(val) = std::env::var("LINEWATCH_DB_PATH") {
            config.storage.db_path = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut LinewatchConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.db_path {
            config.storage.db_path = Some(v.clone());
        }
        if let Some(v) = cli.line_position {
            config.counting.line_position = Some(v);
        }
        if let Some(v) = cli.alert_threshold {
            config.alert.threshold = Some(v);
        }
        if let Some(v) = cli.window_minutes {
            config.alert.window_minutes = Some(v);
        }
        if let Some(v) = cli.cooldown_seconds {
            config.alert.cooldown_seconds = Some(v);
        }
    }
}

/// Parse an environment variable, warning (not failing) on garbage.
fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let val = std::env::var(key).ok()?;
    match val.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %val, "ignoring unparseable environment override");
            None
        }
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
