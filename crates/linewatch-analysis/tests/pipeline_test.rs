//! CountingPipeline end-to-end tests against the SQLite store and a
//! failure-injecting log.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use linewatch_analysis::{CountingPipeline, MonitorState};
use linewatch_core::config::LinewatchConfig;
use linewatch_core::errors::{PipelineError, StorageError};
use linewatch_core::events::{
    CrossingRecordedEvent, StorageErrorEvent, TrafficAlert, TrafficEventHandler,
};
use linewatch_core::traits::CrossingLog;
use linewatch_core::types::{EventId, Frame, NewCrossing, Observation, Timestamp, TrackId};
use linewatch_storage::SqliteEventStore;

const CAR: u32 = 2;

fn default_config() -> LinewatchConfig {
    LinewatchConfig::default()
}

fn frame(t: f64, observations: Vec<Observation>) -> Frame {
    Frame::new(t, 1000, observations)
}

/// Frame with one car per track id, all at `center_y`.
fn cars_at(t: f64, tracks: std::ops::Range<i64>, center_y: f32) -> Frame {
    frame(
        t,
        tracks.map(|id| Observation::new(id, CAR, 0.9, center_y)).collect(),
    )
}

#[derive(Default)]
struct Recorder {
    crossings: AtomicUsize,
    alerts: Mutex<Vec<TrafficAlert>>,
    storage_errors: Mutex<Vec<StorageErrorEvent>>,
}

impl TrafficEventHandler for Recorder {
    fn on_crossing_recorded(&self, _event: &CrossingRecordedEvent) {
        self.crossings.fetch_add(1, Ordering::SeqCst);
    }

    fn on_traffic_alert(&self, alert: &TrafficAlert) {
        self.alerts.lock().unwrap().push(*alert);
    }

    fn on_storage_error(&self, event: &StorageErrorEvent) {
        self.storage_errors.lock().unwrap().push(event.clone());
    }
}

/// Wraps the SQLite store; fails appends from the `fail_from`-th call on
/// while `failing` is set.
struct FlakyLog {
    inner: SqliteEventStore,
    appends: AtomicUsize,
    fail_from: usize,
    failing: AtomicBool,
    fail_counts: AtomicBool,
}

impl FlakyLog {
    fn new(fail_from: usize) -> Self {
        Self {
            inner: SqliteEventStore::open_in_memory().unwrap(),
            appends: AtomicUsize::new(0),
            fail_from,
            failing: AtomicBool::new(true),
            fail_counts: AtomicBool::new(false),
        }
    }
}

impl CrossingLog for FlakyLog {
    fn initialize(&self) -> Result<(), StorageError> {
        self.inner.initialize()
    }

    fn append(&self, crossing: &NewCrossing) -> Result<EventId, StorageError> {
        let n = self.appends.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) && n >= self.fail_from {
            return Err(StorageError::unavailable("disk full"));
        }
        self.inner.append(crossing)
    }

    fn count_since(&self, threshold: Timestamp) -> Result<u64, StorageError> {
        if self.fail_counts.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("read failed"));
        }
        self.inner.count_since(threshold)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// END TO END
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn single_car_is_counted_at_the_line() {
    let store = Arc::new(SqliteEventStore::open_in_memory().unwrap());
    let mut pipeline = CountingPipeline::new(&default_config(), Arc::clone(&store)).unwrap();

    let mut counted_at = Vec::new();
    for (i, y) in [550.0, 590.0, 605.0, 650.0].into_iter().enumerate() {
        let report = pipeline
            .process_frame(&cars_at(1000.0 + i as f64, 1..2, y))
            .unwrap();
        if !report.recorded.is_empty() {
            counted_at.push(y);
        }
    }

    assert_eq!(counted_at, vec![605.0]);
    let recent = store.query_recent(10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].track_id, TrackId(1));
    assert_eq!(recent[0].timestamp, Timestamp(1002.0));
}

#[test]
fn non_vehicle_classes_are_never_recorded() {
    let store = Arc::new(SqliteEventStore::open_in_memory().unwrap());
    let mut pipeline = CountingPipeline::new(&default_config(), Arc::clone(&store)).unwrap();

    let person = Observation::new(1, 0, 0.99, 600.0);
    let report = pipeline.process_frame(&frame(1.0, vec![person])).unwrap();
    assert!(report.recorded.is_empty());
    assert_eq!(report.filtered.class_not_accepted, 1);
    assert_eq!(store.count_total().unwrap(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// ALERTING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn tenth_crossing_in_the_window_alerts() {
    let store = Arc::new(SqliteEventStore::open_in_memory().unwrap());
    let mut pipeline = CountingPipeline::new(&default_config(), Arc::clone(&store)).unwrap();
    let recorder = Arc::new(Recorder::default());
    pipeline.register_handler(recorder.clone());

    let report = pipeline.process_frame(&cars_at(100.0, 0..9, 600.0)).unwrap();
    assert_eq!(report.decision.count, 9);
    assert!(report.alert.is_none());

    let report = pipeline.process_frame(&cars_at(101.0, 9..10, 600.0)).unwrap();
    assert_eq!(report.decision.count, 10);
    let alert = report.alert.expect("tenth crossing alerts");
    assert_eq!(alert.count, 10);
    assert_eq!(alert.threshold, 10);
    assert_eq!(alert.triggered_at, Timestamp(101.0));

    assert_eq!(recorder.crossings.load(Ordering::SeqCst), 10);
    assert_eq!(recorder.alerts.lock().unwrap().len(), 1);
}

#[test]
fn crossings_outside_the_window_do_not_count() {
    let store = Arc::new(SqliteEventStore::open_in_memory().unwrap());
    let mut pipeline = CountingPipeline::new(&default_config(), Arc::clone(&store)).unwrap();

    pipeline.process_frame(&cars_at(0.0, 0..9, 600.0)).unwrap();
    let report = pipeline.process_frame(&cars_at(61.0, 9..10, 600.0)).unwrap();
    assert_eq!(report.decision.count, 1);
    assert!(report.alert.is_none());
}

#[test]
fn cooldown_allows_one_alert_per_interval() {
    let store = Arc::new(SqliteEventStore::open_in_memory().unwrap());
    let mut pipeline = CountingPipeline::new(&default_config(), Arc::clone(&store)).unwrap();

    let first = pipeline.process_frame(&cars_at(100.0, 0..10, 600.0)).unwrap();
    assert!(first.alert.is_some());
    let second = pipeline.process_frame(&cars_at(103.0, 10..11, 600.0)).unwrap();
    assert!(second.alert.is_none());
    assert_eq!(second.decision.count, 11);
    assert!(matches!(
        pipeline.monitor().state(Timestamp(103.0)),
        MonitorState::Cooldown { .. }
    ));

    let third = pipeline.process_frame(&cars_at(111.0, 11..12, 600.0)).unwrap();
    assert!(third.alert.is_some());
}

// ═══════════════════════════════════════════════════════════════════════════
// STORAGE FAILURE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn failed_append_reverts_remaining_candidates() {
    let log = Arc::new(FlakyLog::new(1));
    let mut pipeline = CountingPipeline::new(&default_config(), Arc::clone(&log)).unwrap();
    let recorder = Arc::new(Recorder::default());
    pipeline.register_handler(recorder.clone());

    let err = pipeline
        .process_frame(&cars_at(10.0, 1..4, 600.0))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Storage(StorageError::Unavailable { .. })));

    // Track 1 was persisted before the failure; 2 and 3 were reverted.
    assert!(pipeline.detector().is_counted(TrackId(1)));
    assert!(!pipeline.detector().is_counted(TrackId(2)));
    assert!(!pipeline.detector().is_counted(TrackId(3)));
    assert_eq!(log.inner.count_total().unwrap(), 1);

    let errors = recorder.storage_errors.lock().unwrap().clone();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].dropped_candidates, 2);
    assert_eq!(errors[0].error_code, "STORAGE_UNAVAILABLE");
}

#[test]
fn reverted_tracks_are_counted_once_storage_recovers() {
    let log = Arc::new(FlakyLog::new(0));
    let mut pipeline = CountingPipeline::new(&default_config(), Arc::clone(&log)).unwrap();

    assert!(pipeline.process_frame(&cars_at(10.0, 1..3, 600.0)).is_err());
    log.failing.store(false, Ordering::SeqCst);

    // Still at the line: compared against the pre-failure position.
    let report = pipeline.process_frame(&cars_at(11.0, 1..3, 600.0)).unwrap();
    assert_eq!(report.recorded.len(), 2);
    let report = pipeline.process_frame(&cars_at(12.0, 1..3, 610.0)).unwrap();
    assert!(report.recorded.is_empty());
    assert_eq!(log.inner.count_total().unwrap(), 2);
}

#[test]
fn failed_rate_evaluation_keeps_alert_state() {
    let log = Arc::new(FlakyLog::new(usize::MAX));
    let mut pipeline = CountingPipeline::new(&default_config(), Arc::clone(&log)).unwrap();
    pipeline.process_frame(&cars_at(100.0, 0..10, 600.0)).unwrap();
    assert_eq!(pipeline.monitor().last_alert_time(), Some(Timestamp(100.0)));

    log.fail_counts.store(true, Ordering::SeqCst);
    let err = pipeline
        .process_frame(&cars_at(200.0, 10..20, 600.0))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Storage(_)));
    assert_eq!(pipeline.monitor().last_alert_time(), Some(Timestamp(100.0)));
    // The appends themselves succeeded.
    assert_eq!(log.inner.count_total().unwrap(), 20);
}

#[test]
fn invalid_configuration_fails_construction() {
    let mut config = default_config();
    config.alert.threshold = Some(0);
    let store = Arc::new(SqliteEventStore::open_in_memory().unwrap());
    let result = CountingPipeline::new(&config, store);
    assert!(matches!(result, Err(PipelineError::Config(_))));
}
