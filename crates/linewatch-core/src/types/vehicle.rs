//! Vehicle categories and their COCO class ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Vehicle categories the counter knows how to name.
///
/// The discriminants are the COCO class ids emitted by YOLO-family detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VehicleClass {
    Car,
    Motorcycle,
    Bus,
    Truck,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 4] = [Self::Car, Self::Motorcycle, Self::Bus, Self::Truck];

    /// Map a raw tracker class id onto a vehicle category.
    pub fn from_class_id(class_id: u32) -> Option<Self> {
        match class_id {
            2 => Some(Self::Car),
            3 => Some(Self::Motorcycle),
            5 => Some(Self::Bus),
            7 => Some(Self::Truck),
            _ => None,
        }
    }

    pub fn class_id(self) -> u32 {
        match self {
            Self::Car => 2,
            Self::Motorcycle => 3,
            Self::Bus => 5,
            Self::Truck => 7,
        }
    }

    /// Name persisted in the `vehicle_class` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Motorcycle => "Motorcycle",
            Self::Bus => "Bus",
            Self::Truck => "Truck",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown vehicle class '{s}'"))
    }
}
