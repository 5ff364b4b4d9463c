//! Parking tickets

use super::fee::billable_hours;
use super::spot::Spot;
use super::vehicle::Vehicle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide so ids stay unique across every lot in the process
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Unique, monotonically increasing ticket identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TicketId(u64);

impl TicketId {
    /// Mint the next id
    pub fn next() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TKT-{:06}", self.0)
    }
}

/// Record of one vehicle's stay in one spot
///
/// Issued together with a successful park and closed exactly once at exit.
/// The spot is shared with its floor and outlives the ticket.
#[derive(Debug, Clone)]
pub struct Ticket {
    id: TicketId,
    vehicle: Vehicle,
    spot: Arc<Spot>,
    entry_time: DateTime<Utc>,
    exit_time: Option<DateTime<Utc>>,
    fee: f64,
    paid: bool,
}

impl Ticket {
    pub(crate) fn issue(vehicle: Vehicle, spot: Arc<Spot>, entry_time: DateTime<Utc>) -> Self {
        Self {
            id: TicketId::next(),
            vehicle,
            spot,
            entry_time,
            exit_time: None,
            fee: 0.0,
            paid: false,
        }
    }

    pub(crate) fn close(&mut self, exit_time: DateTime<Utc>, fee: f64) {
        self.exit_time = Some(exit_time);
        self.fee = fee;
        self.paid = true;
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn spot(&self) -> &Arc<Spot> {
        &self.spot
    }

    pub fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }

    pub fn exit_time(&self) -> Option<DateTime<Utc>> {
        self.exit_time
    }

    pub fn fee(&self) -> f64 {
        self.fee
    }

    pub fn is_paid(&self) -> bool {
        self.paid
    }

    /// Whole minutes parked; `None` while the ticket is open
    pub fn duration_minutes(&self) -> Option<i64> {
        self.exit_time
            .map(|exit| (exit - self.entry_time).num_minutes())
    }

    /// Hours billed for the stay; `None` while the ticket is open
    pub fn billable_hours(&self) -> Option<u64> {
        self.exit_time
            .map(|exit| billable_hours(self.entry_time, exit))
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticket[{}, {}, Spot:{}, Entry:{}, Fee:{:.2}]",
            self.id,
            self.vehicle,
            self.spot.id(),
            self.entry_time.to_rfc3339(),
            self.fee
        )
    }
}
