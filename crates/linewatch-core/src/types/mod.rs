//! Domain types: observations coming in, crossing events going out.

pub mod crossing;
pub mod frame;
pub mod observation;
pub mod time;
pub mod vehicle;

pub use crossing::{CrossingEvent, EventId, NewCrossing};
pub use frame::{Frame, FrameRecord, TrackedBox};
pub use observation::{BoundingBox, Observation, TrackId};
pub use time::Timestamp;
pub use vehicle::VehicleClass;
