//! Alert sinks for `linewatch run`.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use linewatch_core::events::{
    CrossingRecordedEvent, StorageErrorEvent, TrafficAlert, TrafficEventHandler,
};

/// Writes every traffic alert as one JSON line and counts persisted
/// crossings, including those of frames that failed after their appends.
pub struct JsonLineSink<W: Write + Send> {
    out: Mutex<W>,
    alerts: AtomicU64,
    crossings: AtomicU64,
}

impl<W: Write + Send> JsonLineSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            alerts: AtomicU64::new(0),
            crossings: AtomicU64::new(0),
        }
    }

    pub fn alerts_written(&self) -> u64 {
        self.alerts.load(Ordering::Relaxed)
    }

    pub fn crossings_recorded(&self) -> u64 {
        self.crossings.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> TrafficEventHandler for JsonLineSink<W> {
    fn on_crossing_recorded(&self, _event: &CrossingRecordedEvent) {
        self.crossings.fetch_add(1, Ordering::Relaxed);
    }

    fn on_traffic_alert(&self, alert: &TrafficAlert) {
        let line = match serde_json::to_string(alert) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize alert");
                return;
            }
        };
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::error!(error = %e, "failed to write alert");
            return;
        }
        self.alerts.fetch_add(1, Ordering::Relaxed);
    }

    fn on_storage_error(&self, event: &StorageErrorEvent) {
        tracing::error!(
            code = %event.error_code,
            dropped = event.dropped_candidates,
            "{}",
            event.message
        );
    }
}

#[cfg(test)]
mod tests {
    use linewatch_core::types::Timestamp;

    use super::*;

    #[test]
    fn recorded_crossings_are_counted() {
        use linewatch_core::types::{CrossingEvent, TrackId, VehicleClass};

        let sink = JsonLineSink::new(Vec::new());
        for event_id in 1..=3 {
            sink.on_crossing_recorded(&CrossingRecordedEvent {
                event: CrossingEvent {
                    event_id,
                    timestamp: Timestamp(event_id as f64),
                    vehicle_class: VehicleClass::Car,
                    track_id: TrackId(event_id),
                    confidence: 0.9,
                },
            });
        }
        assert_eq!(sink.crossings_recorded(), 3);
        assert_eq!(sink.alerts_written(), 0);
        assert!(sink.into_inner().is_empty());
    }

    #[test]
    fn alerts_are_json_lines() {
        let sink = JsonLineSink::new(Vec::new());
        sink.on_traffic_alert(&TrafficAlert {
            triggered_at: Timestamp(12.5),
            count: 11,
            threshold: 10,
        });
        sink.on_traffic_alert(&TrafficAlert {
            triggered_at: Timestamp(30.0),
            count: 12,
            threshold: 10,
        });
        assert_eq!(sink.alerts_written(), 2);

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["triggered_at"], 12.5);
        assert_eq!(first["count"], 11);
        assert_eq!(first["threshold"], 10);
    }
}
