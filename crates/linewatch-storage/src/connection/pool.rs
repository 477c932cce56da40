//! Read-only connections for counts and summaries.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use linewatch_core::errors::StorageError;
use rusqlite::{Connection, OpenFlags};

use super::pragmas::configure_reader;

/// Fixed set of read-only connections. A caller takes the first idle one and
/// only queues (in turn) when all are busy.
pub struct ReadPool {
    conns: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ReadPool {
    pub const DEFAULT_SIZE: usize = 2;
    const MAX_SIZE: usize = 8;

    /// The database file must already exist; the writer creates it.
    pub fn open(path: &Path, size: usize) -> Result<Self, StorageError> {
        let conns = (0..size.clamp(1, Self::MAX_SIZE))
            .map(|_| open_reader(path).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            conns,
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        for slot in &self.conns {
            if let Ok(conn) = slot.try_lock() {
                return f(&conn);
            }
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.conns.len();
        // A panic mid-query leaves the connection itself usable.
        let conn = self.conns[idx]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&conn)
    }

    pub fn size(&self) -> usize {
        self.conns.len()
    }
}

fn open_reader(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| StorageError::unavailable(format!("open reader {}: {e}", path.display())))?;
    configure_reader(&conn)?;
    Ok(conn)
}
