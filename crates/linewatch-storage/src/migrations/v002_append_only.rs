//! V002: reject UPDATE and DELETE on crossing_events.

pub const MIGRATION_SQL: &str = r#"
CREATE TRIGGER IF NOT EXISTS crossing_events_no_update
BEFORE UPDATE ON crossing_events
BEGIN
    SELECT RAISE(ABORT, 'crossing_events is append-only');
END;

CREATE TRIGGER IF NOT EXISTS crossing_events_no_delete
BEFORE DELETE ON crossing_events
BEGIN
    SELECT RAISE(ABORT, 'crossing_events is append-only');
END;
"#;
