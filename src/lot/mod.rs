//! Parking lot allocation engine
//!
//! Hands out exclusive spots to vehicles from a fixed pool, under
//! concurrent access, and bills each stay when the vehicle leaves.
//!
//! # Architecture
//!
//! ```text
//! ParkingLot (gate: one park/exit at a time)
//!   ├─→ Floor 1 (lock: search + park) → [F1-S1, F1-M1, F1-L1, ...]
//!   ├─→ Floor 2 (lock: search + park) → [F2-S1, F2-M1, ...]
//!   └─→ Floor N
//!
//! Active tickets (DashMap)
//!   └─→ TKT-000001 → Ticket { vehicle, spot: F1-M1, entry }
//!   └─→ TKT-000002 → Ticket { vehicle, spot: F2-L1, entry }
//! ```
//!
//! Each spot guards its own state, so the re-check inside [`Spot::park`]
//! is the single point where a spot changes hands. Locks are always taken
//! lot → floor → spot.
//!
//! Search policy is a [`SpotFinder`] per floor; pricing is any
//! [`FeeSchedule`] implementation, [`HourlyFee`] by default.

pub mod fee;
pub mod finder;
pub mod floor;
pub mod manager;
pub mod spot;
pub mod stats;
pub mod ticket;
pub mod vehicle;

pub use fee::{billable_hours, FeeSchedule, FlatFee, HourlyFee};
pub use finder::SpotFinder;
pub use floor::{Claim, Floor};
pub use manager::ParkingLot;
pub use spot::{Spot, SpotSize, SpotStatus};
pub use stats::{FloorSnapshot, LotSnapshot, SizeCounts};
pub use ticket::{Ticket, TicketId};
pub use vehicle::{SizeRequirement, Vehicle, VehicleKind};
