//! Configuration system for linewatch.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod alert_config;
pub mod counting_config;
pub mod linewatch_config;
pub mod storage_config;

pub use alert_config::AlertConfig;
pub use counting_config::{CountingConfig, CrossingDirection, CrossingRule};
pub use linewatch_config::{CliOverrides, LinewatchConfig};
pub use storage_config::StorageConfig;
