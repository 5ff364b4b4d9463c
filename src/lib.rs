// Lotkeeper - Concurrent parking spot allocation
// Spots, floors and tickets behind a thread-safe lot manager

#![warn(rust_2018_idioms)]

pub mod config;
pub mod lot;

// Re-exports for convenience
pub use crate::config::{FloorConfig, LotConfig};
pub use lot::{
    FeeSchedule, FlatFee, Floor, HourlyFee, LotSnapshot, ParkingLot, SizeRequirement, Spot,
    SpotFinder, SpotSize, SpotStatus, Ticket, TicketId, Vehicle, VehicleKind,
};

/// Lotkeeper error types
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid floor number: {floor} (lot has {floors} floors)")]
        InvalidFloor { floor: usize, floors: usize },

        #[error("Unknown ticket: {0}")]
        UnknownTicket(String),

        #[error("Already exists: {0}")]
        AlreadyExists(String),

        #[error("Invalid argument: {0}")]
        InvalidArgument(String),

        #[error("Configuration error: {0}")]
        Config(String),
    }

    pub type Result<T> = std::result::Result<T, Error>;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::error::Error;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidFloor {
            floor: 4,
            floors: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid floor number: 4 (lot has 3 floors)"
        );

        let err = Error::UnknownTicket("TKT-000042".to_string());
        assert_eq!(err.to_string(), "Unknown ticket: TKT-000042");
    }
}
