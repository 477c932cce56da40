//! Write connection utilities: BEGIN IMMEDIATE transactions.

use linewatch_core::errors::StorageError;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Execute a write operation inside a BEGIN IMMEDIATE transaction.
/// The write lock is taken at transaction start, so a concurrent writer in
/// another process waits on busy_timeout instead of failing mid-transaction.
/// Rolls back (on drop) if `f` or the commit fails.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(|e| {
        StorageError::Unavailable {
            message: format!("failed to begin immediate transaction: {e}"),
        }
    })?;

    let result = f(&tx)?;

    tx.commit().map_err(|e| StorageError::Unavailable {
        message: format!("failed to commit: {e}"),
    })?;

    Ok(result)
}
