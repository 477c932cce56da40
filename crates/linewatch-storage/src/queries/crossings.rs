//! Queries for the crossing_events table, the append-only log of counted vehicles.

use linewatch_core::errors::StorageError;
use linewatch_core::types::{CrossingEvent, EventId, NewCrossing, Timestamp, TrackId, VehicleClass};
use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::unavailable;

const SELECT_COLUMNS: &str = "SELECT id, timestamp, vehicle_class, track_id, confidence FROM crossing_events";

/// Crossings of one vehicle class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassCount {
    pub vehicle_class: String,
    pub count: u64,
}

/// Crossings inside one whole minute, keyed by the minute's start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowBucket {
    pub minute_start: Timestamp,
    pub count: u64,
}

/// A row exactly as stored, before the class name is decoded.
struct RawCrossing {
    id: i64,
    timestamp: f64,
    vehicle_class: String,
    track_id: i64,
    confidence: f64,
}

impl RawCrossing {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            vehicle_class: row.get(2)?,
            track_id: row.get(3)?,
            confidence: row.get(4)?,
        })
    }

    fn decode(self) -> Result<CrossingEvent, StorageError> {
        let vehicle_class: VehicleClass =
            self.vehicle_class
                .parse()
                .map_err(|e: String| StorageError::Corrupt {
                    details: format!("crossing_events.id={}: {e}", self.id),
                })?;
        Ok(CrossingEvent {
            event_id: self.id,
            timestamp: Timestamp(self.timestamp),
            vehicle_class,
            track_id: TrackId(self.track_id),
            confidence: self.confidence as f32,
        })
    }
}

/// Insert a crossing. Returns the assigned event id.
pub fn insert_crossing(conn: &Connection, crossing: &NewCrossing) -> Result<EventId, StorageError> {
    conn.prepare_cached(
        "INSERT INTO crossing_events (timestamp, vehicle_class, track_id, confidence)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            crossing.timestamp.as_secs(),
            crossing.vehicle_class.as_str(),
            crossing.track_id.0,
            f64::from(crossing.confidence),
        ])
    })
    .map_err(|e| unavailable("insert crossing", e))?;
    Ok(conn.last_insert_rowid())
}

/// Count crossings with `timestamp > threshold`.
pub fn count_since(conn: &Connection, threshold: Timestamp) -> Result<u64, StorageError> {
    let count: i64 = conn
        .prepare_cached("SELECT COUNT(*) FROM crossing_events WHERE timestamp > ?1")
        .and_then(|mut stmt| stmt.query_row(params![threshold.as_secs()], |row| row.get(0)))
        .map_err(|e| unavailable("count crossings", e))?;
    Ok(count as u64)
}

/// Count every crossing ever stored.
pub fn count_total(conn: &Connection) -> Result<u64, StorageError> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM crossing_events", [], |row| row.get(0))
        .map_err(|e| unavailable("count crossings", e))?;
    Ok(count as u64)
}

/// Crossings with `from < timestamp <= to`, oldest first.
pub fn query_range(
    conn: &Connection,
    from: Timestamp,
    to: Timestamp,
) -> Result<Vec<CrossingEvent>, StorageError> {
    let sql = format!("{SELECT_COLUMNS} WHERE timestamp > ?1 AND timestamp <= ?2 ORDER BY timestamp ASC, id ASC");
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| unavailable("prepare range query", e))?;
    let rows = stmt
        .query_map(params![from.as_secs(), to.as_secs()], RawCrossing::from_row)
        .map_err(|e| unavailable("range query", e))?;
    decode_rows(rows)
}

/// Most recent crossings, newest first.
pub fn query_recent(conn: &Connection, limit: usize) -> Result<Vec<CrossingEvent>, StorageError> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY timestamp DESC, id DESC LIMIT ?1");
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| unavailable("prepare recent query", e))?;
    let rows = stmt
        .query_map(params![limit as i64], RawCrossing::from_row)
        .map_err(|e| unavailable("recent query", e))?;
    decode_rows(rows)
}

/// Crossings per vehicle class, most frequent first (ties by class name).
/// `since = None` covers the whole log.
pub fn class_distribution(
    conn: &Connection,
    since: Option<Timestamp>,
) -> Result<Vec<ClassCount>, StorageError> {
    let threshold = since.map(Timestamp::as_secs).unwrap_or(f64::NEG_INFINITY);
    let mut stmt = conn
        .prepare_cached(
            "SELECT vehicle_class, COUNT(*) AS n FROM crossing_events
             WHERE timestamp > ?1
             GROUP BY vehicle_class
             ORDER BY n DESC, vehicle_class ASC",
        )
        .map_err(|e| unavailable("prepare class distribution", e))?;
    let rows = stmt
        .query_map(params![threshold], |row| {
            Ok(ClassCount {
                vehicle_class: row.get(0)?,
                count: row.get::<_, i64>(1)? as u64,
            })
        })
        .map_err(|e| unavailable("class distribution", e))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| unavailable("class distribution", e))
}

/// Crossings bucketed per whole minute for `timestamp > since`, oldest first.
pub fn flow_per_minute(conn: &Connection, since: Timestamp) -> Result<Vec<FlowBucket>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT CAST(timestamp / 60 AS INTEGER) * 60 AS minute, COUNT(*)
             FROM crossing_events
             WHERE timestamp > ?1
             GROUP BY minute
             ORDER BY minute ASC",
        )
        .map_err(|e| unavailable("prepare flow query", e))?;
    let rows = stmt
        .query_map(params![since.as_secs()], |row| {
            Ok(FlowBucket {
                minute_start: Timestamp(row.get::<_, i64>(0)? as f64),
                count: row.get::<_, i64>(1)? as u64,
            })
        })
        .map_err(|e| unavailable("flow query", e))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| unavailable("flow query", e))
}

fn decode_rows(
    rows: impl Iterator<Item = rusqlite::Result<RawCrossing>>,
) -> Result<Vec<CrossingEvent>, StorageError> {
    rows.map(|row| row.map_err(|e| unavailable("read crossing row", e))?.decode())
        .collect()
}
