//! Floors: ordered groups of spots with their own search policy

use super::finder::SpotFinder;
use super::spot::{Spot, SpotSize};
use super::stats::{FloorSnapshot, SizeCounts};
use super::vehicle::{SizeRequirement, Vehicle};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of a search-and-park attempt on one floor
#[derive(Debug, Clone)]
pub enum Claim {
    /// The vehicle now occupies this spot
    Parked(Arc<Spot>),
    /// Nothing on this floor fits
    NoFit,
    /// The finder picked this spot but it refused the vehicle
    ///
    /// Spots only change state through the lot, and the lot holds its gate
    /// and this floor's lock across the search, so this needs a spot that
    /// was parked in by some other path between search and park.
    Contended(Arc<Spot>),
}

#[derive(Debug)]
struct FloorState {
    /// Insertion order, never reordered
    spots: Vec<Arc<Spot>>,
    finder: SpotFinder,
}

/// A floor of the lot
///
/// The floor lock covers the spot list and the finder, and is held across
/// a whole search-and-park so two requesters can never pick the same spot.
/// Other floors stay searchable in parallel.
#[derive(Debug)]
pub struct Floor {
    number: usize,
    state: Mutex<FloorState>,
}

impl Floor {
    /// Create an empty floor
    pub fn new(number: usize, finder: SpotFinder) -> Self {
        Self {
            number,
            state: Mutex::new(FloorState {
                spots: Vec::new(),
                finder,
            }),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// Append a spot; it must have been created for this floor
    pub fn add_spot(&self, spot: Arc<Spot>) -> Result<()> {
        if spot.floor() != self.number {
            return Err(Error::InvalidArgument(format!(
                "Spot {} belongs to floor {}, not floor {}",
                spot.id(),
                spot.floor(),
                self.number
            )));
        }

        debug!(floor = self.number, spot = %spot.id(), size = %spot.size(), "Spot added");
        self.state.lock().spots.push(spot);
        Ok(())
    }

    pub fn contains_spot(&self, id: &str) -> bool {
        self.state.lock().spots.iter().any(|spot| spot.id() == id)
    }

    /// Current search policy
    pub fn finder(&self) -> SpotFinder {
        self.state.lock().finder
    }

    /// Swap the search policy; takes effect for the next search
    pub fn set_finder(&self, finder: SpotFinder) {
        let mut state = self.state.lock();
        debug!(floor = self.number, from = %state.finder, to = %finder, "Spot finder changed");
        state.finder = finder;
    }

    /// Find a spot for `requirement` without parking anything
    pub fn find_available_spot(&self, requirement: &impl SizeRequirement) -> Option<Arc<Spot>> {
        let state = self.state.lock();
        state.finder.find_spot(&state.spots, requirement).cloned()
    }

    /// Search for a spot and park `vehicle` in it, as one step
    pub fn claim_spot(&self, vehicle: &Vehicle) -> Claim {
        let state = self.state.lock();
        match state.finder.find_spot(&state.spots, vehicle) {
            Some(spot) => self.settle(spot, vehicle),
            None => Claim::NoFit,
        }
    }

    /// Park `vehicle` in the spot the finder chose
    fn settle(&self, spot: &Arc<Spot>, vehicle: &Vehicle) -> Claim {
        if spot.park(vehicle) {
            Claim::Parked(Arc::clone(spot))
        } else {
            warn!(floor = self.number, spot = %spot.id(), vehicle = %vehicle, "Chosen spot refused vehicle");
            Claim::Contended(Arc::clone(spot))
        }
    }

    /// Copy of the spot list, in floor order
    pub fn spots(&self) -> Vec<Arc<Spot>> {
        self.state.lock().spots.clone()
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().spots.len()
    }

    pub fn available_count(&self) -> usize {
        self.spots().iter().filter(|spot| spot.is_available()).count()
    }

    pub fn available_count_by_size(&self, size: SpotSize) -> usize {
        self.spots()
            .iter()
            .filter(|spot| spot.size() == size && spot.is_available())
            .count()
    }

    pub fn snapshot(&self) -> FloorSnapshot {
        let (spots, finder) = {
            let state = self.state.lock();
            (state.spots.clone(), state.finder)
        };

        let mut available = SizeCounts::default();
        for spot in spots.iter().filter(|spot| spot.is_available()) {
            available.add(spot.size());
        }

        FloorSnapshot {
            number: self.number,
            finder,
            capacity: spots.len(),
            available,
        }
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Floor {} [Available: {}/{}]",
            self.number,
            self.available_count(),
            self.capacity()
        )
    }
}
