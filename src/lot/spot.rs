//! Spot management for the parking lot

use super::vehicle::{SizeRequirement, Vehicle};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Size class of a spot, also used as a vehicle's requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotSize {
    Small,
    Medium,
    Large,
}

impl SpotSize {
    pub const ALL: [SpotSize; 3] = [SpotSize::Small, SpotSize::Medium, SpotSize::Large];

    /// Check if a vehicle needing `required` can be hosted by this size
    ///
    /// A spot hosts anything at or below its own size, never above.
    pub fn accommodates(self, required: SpotSize) -> bool {
        match self {
            SpotSize::Large => true,
            SpotSize::Medium => matches!(required, SpotSize::Small | SpotSize::Medium),
            SpotSize::Small => required == SpotSize::Small,
        }
    }

    /// One-letter code used in generated spot ids (`F1-S3`)
    pub fn code(self) -> char {
        match self {
            SpotSize::Small => 'S',
            SpotSize::Medium => 'M',
            SpotSize::Large => 'L',
        }
    }
}

impl fmt::Display for SpotSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpotSize::Small => "Small",
            SpotSize::Medium => "Medium",
            SpotSize::Large => "Large",
        };
        f.write_str(name)
    }
}

impl FromStr for SpotSize {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(SpotSize::Small),
            "medium" => Ok(SpotSize::Medium),
            "large" => Ok(SpotSize::Large),
            other => Err(crate::error::Error::InvalidArgument(format!(
                "Unknown spot size: {}",
                other
            ))),
        }
    }
}

/// Occupancy state of a spot
///
/// `Reserved` is part of the model but the allocator never enters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Available,
    Occupied,
    Reserved,
}

impl fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpotStatus::Available => "Available",
            SpotStatus::Occupied => "Occupied",
            SpotStatus::Reserved => "Reserved",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
struct SpotState {
    status: SpotStatus,
    /// Some iff status is Occupied
    occupant: Option<Vehicle>,
}

impl SpotState {
    fn can_fit(&self, size: SpotSize, required: SpotSize) -> bool {
        self.status == SpotStatus::Available && size.accommodates(required)
    }
}

/// A single parking spot
///
/// Identity, size and floor are fixed at construction. Occupancy lives
/// behind a per-spot lock so every check-and-change is serialized no matter
/// which thread issues it.
#[derive(Debug)]
pub struct Spot {
    id: String,
    size: SpotSize,
    floor: usize,
    state: Mutex<SpotState>,
}

impl Spot {
    /// Create a new available spot
    pub fn new(id: impl Into<String>, size: SpotSize, floor: usize) -> Self {
        Self {
            id: id.into(),
            size,
            floor,
            state: Mutex::new(SpotState {
                status: SpotStatus::Available,
                occupant: None,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn size(&self) -> SpotSize {
        self.size
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    pub fn status(&self) -> SpotStatus {
        self.state.lock().status
    }

    /// Vehicle currently parked here, if any
    pub fn occupant(&self) -> Option<Vehicle> {
        self.state.lock().occupant.clone()
    }

    pub fn is_available(&self) -> bool {
        self.state.lock().status == SpotStatus::Available
    }

    /// Check if the spot is free and large enough for `requirement`
    pub fn can_fit(&self, requirement: &impl SizeRequirement) -> bool {
        self.state
            .lock()
            .can_fit(self.size, requirement.required_size())
    }

    /// Park a vehicle here
    ///
    /// The fit check and the state change happen under one lock, so two
    /// callers racing for the same spot can never both succeed. Only the
    /// lot parks vehicles, so every occupant has a ticket.
    pub(crate) fn park(&self, vehicle: &Vehicle) -> bool {
        let mut state = self.state.lock();
        if !state.can_fit(self.size, vehicle.required_size()) {
            return false;
        }

        state.occupant = Some(vehicle.clone());
        state.status = SpotStatus::Occupied;
        debug!(spot = %self.id, vehicle = %vehicle, "Spot occupied");
        true
    }

    /// Free the spot, returning the vehicle that was parked here
    ///
    /// Only `vehicle` itself can be vacated. A free spot, or one held by
    /// anyone else, is left untouched and `None` is returned.
    pub(crate) fn vacate_for(&self, vehicle: &Vehicle) -> Option<Vehicle> {
        let mut state = self.state.lock();
        if state.status != SpotStatus::Occupied {
            warn!(spot = %self.id, status = %state.status, "Vacate on unoccupied spot ignored");
            return None;
        }
        if state.occupant.as_ref() != Some(vehicle) {
            warn!(
                spot = %self.id,
                expected = %vehicle,
                "Vacate for a vehicle not parked here ignored"
            );
            return None;
        }

        state.status = SpotStatus::Available;
        let vehicle = state.occupant.take();
        debug!(spot = %self.id, "Spot freed");
        vehicle
    }
}

impl fmt::Display for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Spot[{}, Floor:{}, Size:{}, Status:{}]",
            self.id,
            self.floor,
            self.size,
            self.status()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_matrix() {
        use SpotSize::*;

        // (spot size, requirement, expected)
        let cases = [
            (Small, Small, true),
            (Small, Medium, false),
            (Small, Large, false),
            (Medium, Small, true),
            (Medium, Medium, true),
            (Medium, Large, false),
            (Large, Small, true),
            (Large, Medium, true),
            (Large, Large, true),
        ];

        for (size, required, expected) in cases {
            let spot = Spot::new("X", size, 1);
            assert_eq!(
                spot.can_fit(&required),
                expected,
                "{} spot with {} requirement",
                size,
                required
            );
        }
    }

    #[test]
    fn test_spot_lifecycle() {
        let spot = Spot::new("F1-M1", SpotSize::Medium, 1);
        let car = Vehicle::car("KA-05-5678");

        assert!(spot.is_available());
        assert!(spot.occupant().is_none());

        assert!(spot.park(&car));
        assert_eq!(spot.status(), SpotStatus::Occupied);
        assert_eq!(spot.occupant(), Some(car.clone()));

        // Occupied spots fit nothing
        assert!(!spot.can_fit(&SpotSize::Small));
        assert!(!spot.park(&Vehicle::motorcycle("MH-01-1234")));
        assert_eq!(spot.occupant(), Some(car.clone()));

        assert_eq!(spot.vacate_for(&car), Some(car));
        assert!(spot.is_available());
        assert!(spot.occupant().is_none());
    }

    #[test]
    fn test_park_rejects_oversized_vehicle() {
        let spot = Spot::new("F1-S1", SpotSize::Small, 1);
        assert!(!spot.park(&Vehicle::bus("MH-12-BUS1")));
        assert_eq!(spot.status(), SpotStatus::Available);
    }

    #[test]
    fn test_vacate_available_spot_is_noop() {
        let spot = Spot::new("F1-L1", SpotSize::Large, 1);
        assert!(spot.vacate_for(&Vehicle::bus("MH-12-BUS1")).is_none());
        assert_eq!(spot.status(), SpotStatus::Available);
        assert!(spot.occupant().is_none());
    }

    #[test]
    fn test_vacate_for_checks_occupant() {
        let spot = Spot::new("F1-M1", SpotSize::Medium, 1);
        let car = Vehicle::car("KA-05-5678");
        let other = Vehicle::car("DL-03-9999");

        assert!(spot.vacate_for(&car).is_none());

        assert!(spot.park(&car));
        assert!(spot.vacate_for(&other).is_none());
        assert_eq!(spot.status(), SpotStatus::Occupied);
        assert_eq!(spot.occupant(), Some(car.clone()));

        assert_eq!(spot.vacate_for(&car), Some(car));
        assert!(spot.is_available());
    }

    #[test]
    fn test_spot_display() {
        let spot = Spot::new("F2-S1", SpotSize::Small, 2);
        assert_eq!(
            spot.to_string(),
            "Spot[F2-S1, Floor:2, Size:Small, Status:Available]"
        );
    }

    #[test]
    fn test_size_codes_and_parsing() {
        assert_eq!(SpotSize::Small.code(), 'S');
        assert_eq!(SpotSize::Large.code(), 'L');
        assert_eq!("MEDIUM".parse::<SpotSize>().unwrap(), SpotSize::Medium);
        assert!("huge".parse::<SpotSize>().is_err());
    }
}
