//! Storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DB_PATH;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file. Default: `traffic_data.db`.
    pub db_path: Option<String>,
}

impl StorageConfig {
    pub fn effective_db_path(&self) -> PathBuf {
        PathBuf::from(self.db_path.as_deref().unwrap_or(DEFAULT_DB_PATH))
    }
}
