//! Connection management: one serialized writer, pooled readers.

pub mod pool;
pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use linewatch_core::errors::StorageError;
use rusqlite::Connection;

use self::pool::ReadPool;
use crate::{migrations, unavailable};

/// Owns every connection to one crossing database.
///
/// All writes go through the single writer, which serializes appends. An
/// in-memory database has no readers: a second in-memory connection would
/// open a different database, so reads share the writer.
pub struct DatabaseManager {
    writer: Mutex<Connection>,
    readers: Option<ReadPool>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open or create the database file (and its parent directory), then
    /// bring the schema up to date.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::unavailable(format!("create {}: {e}", parent.display()))
            })?;
        }

        let writer = Connection::open(path)
            .map_err(|e| unavailable(&format!("open {}", path.display()), e))?;
        let journal = prepare_writer(&writer)?;
        if journal != "wal" {
            tracing::warn!(path = %path.display(), journal = %journal, "WAL mode unavailable");
        }
        let readers = ReadPool::open(path, ReadPool::DEFAULT_SIZE)?;

        tracing::debug!(
            path = %path.display(),
            readers = readers.size(),
            "opened crossing database"
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers: Some(readers),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(|e| unavailable("open in-memory", e))?;
        prepare_writer(&writer)?;
        Ok(Self {
            writer: Mutex::new(writer),
            readers: None,
            path: None,
        })
    }

    /// Run `f` on the writer. Callers are serialized.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        // An interrupted transaction rolls back when its guard drops, so the
        // connection is consistent even after a panic.
        let conn = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn)
    }

    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        match &self.readers {
            Some(pool) => pool.with_conn(f),
            None => self.with_writer(f),
        }
    }

    /// Fold the WAL back into the database file.
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        self.with_writer(|conn| {
            let (busy, log_frames, checkpointed): (i64, i64, i64) = conn
                .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })
                .map_err(|e| unavailable("wal checkpoint", e))?;
            tracing::debug!(busy, log_frames, checkpointed, "wal checkpoint");
            Ok(())
        })
    }

    /// `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn prepare_writer(conn: &Connection) -> Result<String, StorageError> {
    let journal = pragmas::configure_writer(conn)?;
    migrations::run_migrations(conn)?;
    Ok(journal)
}
