//! SqliteEventStore: the SQLite-backed `CrossingLog`.

use std::path::Path;

use linewatch_core::errors::StorageError;
use linewatch_core::traits::CrossingLog;
use linewatch_core::types::{CrossingEvent, EventId, NewCrossing, Timestamp};

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::materialized::summary::{self, TrafficSummary};
use crate::migrations;
use crate::queries::crossings::{self, ClassCount, FlowBucket};

/// Durable crossing log. Appends are serialized through the single writer
/// connection; with WAL and `synchronous = FULL` a returned id survives a
/// crash.
pub struct SqliteEventStore {
    db: DatabaseManager,
}

impl SqliteEventStore {
    /// Open (creating if needed) the database file and bring its schema up to date.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = DatabaseManager::open(path)?;
        Ok(Self { db })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let db = DatabaseManager::open_in_memory()?;
        Ok(Self { db })
    }

    pub fn database(&self) -> &DatabaseManager {
        &self.db
    }

    pub fn count_total(&self) -> Result<u64, StorageError> {
        self.db.with_reader(crossings::count_total)
    }

    /// Events with `from < timestamp <= to`, oldest first.
    pub fn query_range(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<CrossingEvent>, StorageError> {
        self.db
            .with_reader(|conn| crossings::query_range(conn, from, to))
    }

    /// The `limit` newest events, newest first.
    pub fn query_recent(&self, limit: usize) -> Result<Vec<CrossingEvent>, StorageError> {
        self.db
            .with_reader(|conn| crossings::query_recent(conn, limit))
    }

    pub fn class_distribution(
        &self,
        since: Option<Timestamp>,
    ) -> Result<Vec<ClassCount>, StorageError> {
        self.db
            .with_reader(|conn| crossings::class_distribution(conn, since))
    }

    pub fn flow_per_minute(&self, since: Timestamp) -> Result<Vec<FlowBucket>, StorageError> {
        self.db
            .with_reader(|conn| crossings::flow_per_minute(conn, since))
    }

    pub fn summary(
        &self,
        now: Timestamp,
        window_minutes: u32,
        recent_limit: usize,
    ) -> Result<TrafficSummary, StorageError> {
        self.db
            .with_reader(|conn| summary::build_summary(conn, now, window_minutes, recent_limit))
    }

    /// Flush the WAL into the main database file.
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        self.db.checkpoint()
    }
}

impl CrossingLog for SqliteEventStore {
    fn initialize(&self) -> Result<(), StorageError> {
        self.db.with_writer(migrations::run_migrations)
    }

    fn append(&self, crossing: &NewCrossing) -> Result<EventId, StorageError> {
        let event_id = self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| crossings::insert_crossing(tx, crossing))
        })?;
        tracing::debug!(
            event_id,
            track_id = %crossing.track_id,
            class = crossing.vehicle_class.as_str(),
            "appended crossing"
        );
        Ok(event_id)
    }

    fn count_since(&self, threshold: Timestamp) -> Result<u64, StorageError> {
        self.db
            .with_reader(|conn| crossings::count_since(conn, threshold))
    }
}
