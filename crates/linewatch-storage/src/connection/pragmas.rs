//! Per-connection SQLite settings.
//!
//! The writer runs WAL with `synchronous = FULL`: once `append` returns, the
//! event has reached disk. Readers are `query_only`.

use std::time::Duration;

use linewatch_core::errors::StorageError;
use rusqlite::Connection;

use crate::unavailable;

/// How long a connection waits on a lock held by another connection.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Page cache per connection, in KiB (negative = size, not pages).
const CACHE_SIZE_KIB: i64 = -16_000;

/// Configure the write connection. Returns the journal mode in effect:
/// `wal` for files, `memory` for in-memory databases.
pub fn configure_writer(conn: &Connection) -> Result<String, StorageError> {
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| unavailable("set busy timeout", e))?;
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(|e| unavailable("set journal mode", e))?;
    for (name, value) in [("synchronous", "FULL"), ("temp_store", "MEMORY")] {
        conn.pragma_update(None, name, value)
            .map_err(|e| unavailable(name, e))?;
    }
    conn.pragma_update(None, "cache_size", CACHE_SIZE_KIB)
        .map_err(|e| unavailable("cache_size", e))?;
    Ok(mode.to_ascii_lowercase())
}

/// Configure a pooled read connection.
pub fn configure_reader(conn: &Connection) -> Result<(), StorageError> {
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| unavailable("set busy timeout", e))?;
    conn.pragma_update(None, "query_only", true)
        .map_err(|e| unavailable("query_only", e))?;
    conn.pragma_update(None, "cache_size", CACHE_SIZE_KIB)
        .map_err(|e| unavailable("cache_size", e))
}

/// Current journal mode, lower-cased.
pub fn journal_mode(conn: &Connection) -> Result<String, StorageError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| unavailable("read journal mode", e))?;
    Ok(mode.to_ascii_lowercase())
}
