//! Lot manager: floors, active tickets and the park/exit protocol

use super::fee::{billable_hours, FeeSchedule, HourlyFee};
use super::finder::SpotFinder;
use super::floor::{Claim, Floor};
use super::spot::Spot;
use super::stats::LotSnapshot;
use super::ticket::{Ticket, TicketId};
use super::vehicle::{SizeRequirement, Vehicle};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use metrics::{counter, gauge};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A parking lot
///
/// Owns a fixed list of floors, the index of active tickets, the default
/// search policy and the fee schedule. `park` and `exit` each run under a
/// single lot-wide gate, so the ticket index and spot occupancy always agree
/// as seen by any other park or exit. Share it between threads with `Arc`.
pub struct ParkingLot {
    name: String,
    floors: Vec<Floor>,
    active: DashMap<TicketId, Ticket>,
    gate: Mutex<()>,
    default_finder: SpotFinder,
    fees: Arc<dyn FeeSchedule>,
}

impl ParkingLot {
    /// Create a lot with best-fit search and hourly pricing
    pub fn new(name: impl Into<String>, floor_count: usize) -> Result<Self> {
        Self::with_options(
            name,
            floor_count,
            SpotFinder::default(),
            Arc::new(HourlyFee::default()),
        )
    }

    /// Create a lot with a custom default finder and fee schedule
    pub fn with_options(
        name: impl Into<String>,
        floor_count: usize,
        default_finder: SpotFinder,
        fees: Arc<dyn FeeSchedule>,
    ) -> Result<Self> {
        let name = name.into();
        if floor_count == 0 {
            return Err(Error::InvalidArgument(format!(
                "Lot '{}' needs at least one floor",
                name
            )));
        }

        let floors = (1..=floor_count)
            .map(|number| Floor::new(number, default_finder))
            .collect();

        info!(lot = %name, floors = floor_count, finder = %default_finder, "Parking lot created");

        Ok(Self {
            name,
            floors,
            active: DashMap::new(),
            gate: Mutex::new(()),
            default_finder,
            fees,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_finder(&self) -> SpotFinder {
        self.default_finder
    }

    pub fn fee_schedule(&self) -> &Arc<dyn FeeSchedule> {
        &self.fees
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    /// Floor by 1-based number
    pub fn floor(&self, number: usize) -> Result<&Floor> {
        number
            .checked_sub(1)
            .and_then(|index| self.floors.get(index))
            .ok_or(Error::InvalidFloor {
                floor: number,
                floors: self.floors.len(),
            })
    }

    /// Swap the search policy of one floor at runtime
    pub fn set_floor_finder(&self, floor: usize, finder: SpotFinder) -> Result<()> {
        self.floor(floor)?.set_finder(finder);
        Ok(())
    }

    /// Add a spot to a floor
    ///
    /// Administrative; not meant to race with traffic. Spot ids must be
    /// unique across the lot.
    pub fn add_spot(&self, floor: usize, spot: Spot) -> Result<Arc<Spot>> {
        let target = self.floor(floor)?;

        let _gate = self.gate.lock();
        if self.floors.iter().any(|f| f.contains_spot(spot.id())) {
            return Err(Error::AlreadyExists(format!("Spot {}", spot.id())));
        }

        let spot = Arc::new(spot);
        target.add_spot(Arc::clone(&spot))?;
        Ok(spot)
    }

    /// Park a vehicle in the first floor that has room for it
    ///
    /// Returns `None` when the lot is full for this vehicle. If the spot a
    /// floor picked refuses the vehicle, the request ends with `None` rather
    /// than scanning again.
    pub fn park(&self, vehicle: &Vehicle) -> Option<Ticket> {
        let _gate = self.gate.lock();

        for floor in &self.floors {
            match floor.claim_spot(vehicle) {
                Claim::NoFit => continue,
                Claim::Contended(spot) => {
                    warn!(lot = %self.name, vehicle = %vehicle, spot = %spot.id(), "Lost claim race, giving up");
                    counter!("lotkeeper_park_total", "outcome" => "contended").increment(1);
                    return None;
                }
                Claim::Parked(spot) => {
                    let ticket = Ticket::issue(vehicle.clone(), spot, Utc::now());
                    self.active.insert(ticket.id(), ticket.clone());

                    info!(
                        lot = %self.name,
                        ticket = %ticket.id(),
                        vehicle = %vehicle,
                        spot = %ticket.spot().id(),
                        floor = floor.number(),
                        "Vehicle parked"
                    );
                    counter!("lotkeeper_park_total", "outcome" => "parked").increment(1);
                    gauge!("lotkeeper_active_tickets").set(self.active.len() as f64);
                    return Some(ticket);
                }
            }
        }

        debug!(lot = %self.name, vehicle = %vehicle, size = %vehicle.required_size(), "No spot available");
        counter!("lotkeeper_park_total", "outcome" => "full").increment(1);
        None
    }

    /// Process an exit now and return the fee charged
    pub fn exit(&self, id: TicketId) -> Result<f64> {
        self.exit_at(id, Utc::now()).map(|ticket| ticket.fee())
    }

    /// Process an exit now and return the closed ticket
    pub fn exit_ticket(&self, id: TicketId) -> Result<Ticket> {
        self.exit_at(id, Utc::now())
    }

    /// Process an exit at an explicit time
    ///
    /// Unknown or already-closed ids fail with [`Error::UnknownTicket`] and
    /// change nothing. The spot is only freed if the ticket's own vehicle is
    /// still parked there; a different occupant keeps it.
    pub fn exit_at(&self, id: TicketId, exit_time: DateTime<Utc>) -> Result<Ticket> {
        let _gate = self.gate.lock();

        let Some((_, mut ticket)) = self.active.remove(&id) else {
            warn!(lot = %self.name, ticket = %id, "Exit with unknown ticket");
            counter!("lotkeeper_exit_total", "outcome" => "unknown").increment(1);
            return Err(Error::UnknownTicket(id.to_string()));
        };

        let hours = billable_hours(ticket.entry_time(), exit_time);
        let fee = self.fees.fee(ticket.vehicle().required_size(), hours);
        ticket.close(exit_time, fee);
        if ticket.spot().vacate_for(ticket.vehicle()).is_none() {
            warn!(
                lot = %self.name,
                ticket = %id,
                spot = %ticket.spot().id(),
                occupant = ?ticket.spot().occupant().map(|v| v.to_string()),
                "Ticket closed without freeing its spot"
            );
            counter!("lotkeeper_exit_total", "outcome" => "spot_mismatch").increment(1);
        }

        info!(
            lot = %self.name,
            ticket = %id,
            vehicle = %ticket.vehicle(),
            spot = %ticket.spot().id(),
            hours,
            fee,
            "Vehicle exited"
        );
        counter!("lotkeeper_exit_total", "outcome" => "paid").increment(1);
        gauge!("lotkeeper_fees_collected").increment(fee);
        gauge!("lotkeeper_active_tickets").set(self.active.len() as f64);

        Ok(ticket)
    }

    /// Look up an active ticket
    pub fn ticket(&self, id: TicketId) -> Option<Ticket> {
        self.active.get(&id).map(|entry| entry.value().clone())
    }

    /// Copy of all active tickets, oldest first
    pub fn active_tickets(&self) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self
            .active
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        tickets.sort_by_key(|ticket| ticket.id());
        tickets
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn total_available(&self) -> usize {
        self.floors.iter().map(Floor::available_count).sum()
    }

    pub fn total_capacity(&self) -> usize {
        self.floors.iter().map(Floor::capacity).sum()
    }

    /// Availability per floor and size, plus the active ticket count
    pub fn snapshot(&self) -> LotSnapshot {
        let floors: Vec<_> = self.floors.iter().map(Floor::snapshot).collect();
        let total_capacity = floors.iter().map(|f| f.capacity).sum();
        let total_available = floors.iter().map(|f| f.available.total()).sum();

        LotSnapshot {
            name: self.name.clone(),
            taken_at: Utc::now(),
            floors,
            total_capacity,
            total_available,
            active_tickets: self.active.len(),
        }
    }
}

impl fmt::Debug for ParkingLot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParkingLot")
            .field("name", &self.name)
            .field("floors", &self.floors.len())
            .field("active", &self.active.len())
            .field("default_finder", &self.default_finder)
            .field("fees", &self.fees)
            .finish()
    }
}
