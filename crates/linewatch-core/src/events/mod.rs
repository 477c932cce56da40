//! Event system for linewatch.
//! Trait with no-op defaults, synchronous dispatch, zero overhead when empty.
//! The alert sink is any handler that implements `on_traffic_alert`.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::TrafficEventHandler;
pub use types::{CrossingRecordedEvent, ObservationsFilteredEvent, StorageErrorEvent, TrafficAlert};
