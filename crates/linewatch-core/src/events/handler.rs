//! TrafficEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for handling linewatch events.
///
/// Handlers only override the events they care about. `Send + Sync` so a
/// handler can be shared with a monitoring thread.
pub trait TrafficEventHandler: Send + Sync {
    fn on_crossing_recorded(&self, _event: &CrossingRecordedEvent) {}
    fn on_traffic_alert(&self, _alert: &TrafficAlert) {}
    fn on_storage_error(&self, _event: &StorageErrorEvent) {}
    fn on_observations_filtered(&self, _event: &ObservationsFilteredEvent) {}
}
