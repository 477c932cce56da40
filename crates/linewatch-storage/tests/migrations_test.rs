//! Schema tests: versioning, idempotence, append-only enforcement, pragmas.

use linewatch_storage::connection::pragmas;
use linewatch_storage::migrations::{current_version, run_migrations, LATEST_VERSION};
use linewatch_storage::DatabaseManager;
use rusqlite::Connection;
use tempfile::tempdir;

fn migrated() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
}

fn insert_row(conn: &Connection) {
    conn.execute(
        "INSERT INTO crossing_events (timestamp, vehicle_class, track_id, confidence)
         VALUES (100.0, 'Car', 1, 0.9)",
        [],
    )
    .unwrap();
}

#[test]
fn fresh_database_reaches_latest_version() {
    let conn = migrated();
    assert_eq!(current_version(&conn).unwrap(), LATEST_VERSION);
}

#[test]
fn rerunning_migrations_is_a_no_op() {
    let conn = migrated();
    insert_row(&conn);
    run_migrations(&conn).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM crossing_events", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(current_version(&conn).unwrap(), LATEST_VERSION);
}

#[test]
fn updates_are_rejected() {
    let conn = migrated();
    insert_row(&conn);
    let err = conn
        .execute("UPDATE crossing_events SET vehicle_class = 'Bus'", [])
        .unwrap_err();
    assert!(err.to_string().contains("append-only"), "{err}");
}

#[test]
fn deletes_are_rejected() {
    let conn = migrated();
    insert_row(&conn);
    let err = conn.execute("DELETE FROM crossing_events", []).unwrap_err();
    assert!(err.to_string().contains("append-only"), "{err}");
}

#[test]
fn strict_table_rejects_text_timestamps() {
    let conn = migrated();
    let result = conn.execute(
        "INSERT INTO crossing_events (timestamp, vehicle_class, track_id, confidence)
         VALUES ('yesterday', 'Car', 1, 0.9)",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn file_database_runs_in_wal_mode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("traffic.db");
    let db = DatabaseManager::open(&path).unwrap();
    assert_eq!(db.path(), Some(path.as_path()));
    db.with_writer(|conn| {
        assert_eq!(pragmas::journal_mode(conn)?, "wal");
        Ok(())
    })
    .unwrap();
}

#[test]
fn in_memory_database_has_no_path() {
    let db = DatabaseManager::open_in_memory().unwrap();
    assert!(db.path().is_none());
    let version = db.with_reader(current_version).unwrap();
    assert_eq!(version, LATEST_VERSION);
}
