//! V001: crossing_events, the append-only crossing log.

pub const MIGRATION_SQL: &str = r#"
-- One row per counted vehicle. id doubles as the monotonic event id;
-- AUTOINCREMENT guarantees ids are never reused.
CREATE TABLE IF NOT EXISTS crossing_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp REAL NOT NULL,
    vehicle_class TEXT NOT NULL,
    track_id INTEGER NOT NULL,
    confidence REAL NOT NULL
) STRICT;

-- Windowed counts scan by capture time.
CREATE INDEX IF NOT EXISTS idx_crossing_events_timestamp
    ON crossing_events(timestamp);
CREATE INDEX IF NOT EXISTS idx_crossing_events_class
    ON crossing_events(vehicle_class, timestamp);
"#;
