//! Subcommand implementations.

pub mod init;
pub mod run;
pub mod stats;

use std::path::Path;

use anyhow::Context;
use linewatch_core::config::{CliOverrides, LinewatchConfig};
use linewatch_storage::SqliteEventStore;

/// Resolve configuration for `root` with the command's flag overrides.
pub fn load_config(root: &Path, overrides: &CliOverrides) -> anyhow::Result<LinewatchConfig> {
    LinewatchConfig::load(root, Some(overrides))
        .with_context(|| format!("loading configuration from {}", root.display()))
}

/// Open the configured crossing log, creating it if needed.
pub fn open_store(config: &LinewatchConfig) -> anyhow::Result<SqliteEventStore> {
    let path = config.storage.effective_db_path();
    SqliteEventStore::open(&path).with_context(|| format!("opening {}", path.display()))
}
