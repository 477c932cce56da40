//! Schema migrations using PRAGMA user_version.

pub mod v001_crossing_events;
pub mod v002_append_only;

use linewatch_core::errors::StorageError;
use rusqlite::Connection;

/// Latest schema version known to this build.
pub const LATEST_VERSION: u32 = 2;

/// Run all pending migrations. Already-applied versions are skipped, so this
/// is safe to call on every start.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current_version = current_version(conn).map_err(|e| StorageError::MigrationFailed {
        version: 0,
        message: e.to_string(),
    })?;

    let migrations: &[(&str, u32)] = &[
        (v001_crossing_events::MIGRATION_SQL, 1),
        (v002_append_only::MIGRATION_SQL, 2),
    ];

    for (sql, version) in migrations {
        if current_version < *version {
            conn.execute_batch(sql).map_err(|e| StorageError::MigrationFailed {
                version: *version,
                message: e.to_string(),
            })?;

            conn.pragma_update(None, "user_version", version)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    message: e.to_string(),
                })?;
            tracing::info!(version = version, "applied migration");
        }
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::Unavailable {
            message: e.to_string(),
        })
}
