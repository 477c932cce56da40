//! SQLite persistence for crossing events.
//!
//! One serialized writer connection plus a small pool of read-only
//! connections; schema versioned through `PRAGMA user_version`.

pub mod connection;
pub mod materialized;
pub mod migrations;
pub mod queries;
pub mod store;

pub use connection::DatabaseManager;
pub use materialized::summary::TrafficSummary;
pub use store::SqliteEventStore;

use linewatch_core::errors::StorageError;

/// Map any rusqlite failure onto `StorageError::Unavailable`.
pub(crate) fn unavailable(context: &str, e: rusqlite::Error) -> StorageError {
    StorageError::Unavailable {
        message: format!("{context}: {e}"),
    }
}
