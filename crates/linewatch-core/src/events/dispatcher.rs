//! EventDispatcher: synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::TrafficEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn TrafficEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn TrafficEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A handler that panics is logged and does not prevent subsequent
    /// handlers from receiving the event.
    fn emit<F: Fn(&dyn TrafficEventHandler)>(&self, event_name: &'static str, f: F) {
        for (index, handler) in self.handlers.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!(event = event_name, handler = index, "event handler panicked");
            }
        }
    }

    pub fn emit_crossing_recorded(&self, event: &CrossingRecordedEvent) {
        self.emit("crossing_recorded", |h| h.on_crossing_recorded(event));
    }

    pub fn emit_traffic_alert(&self, alert: &TrafficAlert) {
        self.emit("traffic_alert", |h| h.on_traffic_alert(alert));
    }

    pub fn emit_storage_error(&self, event: &StorageErrorEvent) {
        self.emit("storage_error", |h| h.on_storage_error(event));
    }

    pub fn emit_observations_filtered(&self, event: &ObservationsFilteredEvent) {
        self.emit("observations_filtered", |h| h.on_observations_filtered(event));
    }
}
