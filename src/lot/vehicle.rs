//! Vehicles and the spot size they need

use super::spot::SpotSize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anything that can ask the lot for a spot
///
/// Spots and finders only care about the size a requester needs, so any
/// type that can name one may be matched against a floor.
pub trait SizeRequirement {
    /// Smallest spot size that can hold this requester
    fn required_size(&self) -> SpotSize;
}

impl SizeRequirement for SpotSize {
    fn required_size(&self) -> SpotSize {
        *self
    }
}

/// Kinds of vehicle the lot admits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Motorcycle,
    Car,
    Bus,
}

impl SizeRequirement for VehicleKind {
    fn required_size(&self) -> SpotSize {
        match self {
            VehicleKind::Motorcycle => SpotSize::Small,
            VehicleKind::Car => SpotSize::Medium,
            VehicleKind::Bus => SpotSize::Large,
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleKind::Motorcycle => "Motorcycle",
            VehicleKind::Car => "Car",
            VehicleKind::Bus => "Bus",
        };
        f.write_str(name)
    }
}

impl FromStr for VehicleKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "motorcycle" => Ok(VehicleKind::Motorcycle),
            "car" => Ok(VehicleKind::Car),
            "bus" => Ok(VehicleKind::Bus),
            other => Err(crate::error::Error::InvalidArgument(format!(
                "Unknown vehicle kind: {}",
                other
            ))),
        }
    }
}

/// A vehicle identified by its license plate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vehicle {
    plate: String,
    kind: VehicleKind,
}

impl Vehicle {
    pub fn new(plate: impl Into<String>, kind: VehicleKind) -> Self {
        Self {
            plate: plate.into(),
            kind,
        }
    }

    pub fn motorcycle(plate: impl Into<String>) -> Self {
        Self::new(plate, VehicleKind::Motorcycle)
    }

    pub fn car(plate: impl Into<String>) -> Self {
        Self::new(plate, VehicleKind::Car)
    }

    pub fn bus(plate: impl Into<String>) -> Self {
        Self::new(plate, VehicleKind::Bus)
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }
}

impl SizeRequirement for Vehicle {
    fn required_size(&self) -> SpotSize {
        self.kind.required_size()
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.kind, self.plate)
    }
}
