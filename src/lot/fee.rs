//! Fee schedules
//!
//! A lot bills every stay through a [`FeeSchedule`]. The schedule only sees
//! the size the vehicle needed and the hours to bill, so pricing can change
//! without touching the allocator.

use super::spot::SpotSize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

const MILLIS_PER_HOUR: u64 = 60 * 60 * 1000;

/// Hours to bill for a stay: partial hours round up, minimum one hour
pub fn billable_hours(entry: DateTime<Utc>, exit: DateTime<Utc>) -> u64 {
    let millis = (exit - entry).num_milliseconds().max(0) as u64;
    millis.div_ceil(MILLIS_PER_HOUR).max(1)
}

/// Pricing policy for a finished stay
pub trait FeeSchedule: Send + Sync + Debug {
    /// Amount owed for `hours` billed on a vehicle needing `size`
    fn fee(&self, size: SpotSize, hours: u64) -> f64;
}

/// Base fee plus a per-size hourly rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyFee {
    pub base_fee: f64,
    pub small_rate: f64,
    pub medium_rate: f64,
    pub large_rate: f64,
}

impl HourlyFee {
    pub fn rate(&self, size: SpotSize) -> f64 {
        match size {
            SpotSize::Small => self.small_rate,
            SpotSize::Medium => self.medium_rate,
            SpotSize::Large => self.large_rate,
        }
    }
}

impl Default for HourlyFee {
    fn default() -> Self {
        Self {
            base_fee: 5.0,
            small_rate: 10.0,
            medium_rate: 20.0,
            large_rate: 40.0,
        }
    }
}

impl FeeSchedule for HourlyFee {
    fn fee(&self, size: SpotSize, hours: u64) -> f64 {
        self.base_fee + self.rate(size) * hours as f64
    }
}

/// Same amount for every stay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatFee {
    pub amount: f64,
}

impl FeeSchedule for FlatFee {
    fn fee(&self, _size: SpotSize, _hours: u64) -> f64 {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_billable_hours_rounding() {
        let entry = Utc::now();

        // Immediate exit still bills the minimum hour
        assert_eq!(billable_hours(entry, entry), 1);
        assert_eq!(billable_hours(entry, entry + Duration::seconds(1)), 1);
        assert_eq!(billable_hours(entry, entry + Duration::minutes(60)), 1);
        assert_eq!(billable_hours(entry, entry + Duration::minutes(61)), 2);
        assert_eq!(billable_hours(entry, entry + Duration::minutes(90)), 2);
        assert_eq!(billable_hours(entry, entry + Duration::hours(5)), 5);
    }

    #[test]
    fn test_billable_hours_clock_skew() {
        let entry = Utc::now();
        assert_eq!(billable_hours(entry, entry - Duration::minutes(5)), 1);
    }

    #[test]
    fn test_hourly_fee_defaults() {
        let fees = HourlyFee::default();
        assert_eq!(fees.fee(SpotSize::Small, 1), 15.0);
        assert_eq!(fees.fee(SpotSize::Medium, 2), 45.0);
        assert_eq!(fees.fee(SpotSize::Large, 3), 125.0);
    }

    #[test]
    fn test_flat_fee_ignores_duration() {
        let fees = FlatFee { amount: 12.5 };
        assert_eq!(fees.fee(SpotSize::Small, 1), 12.5);
        assert_eq!(fees.fee(SpotSize::Large, 24), 12.5);
    }

    #[test]
    fn test_hourly_fee_partial_toml() {
        let fees: HourlyFee = toml::from_str("base_fee = 2.0\nlarge_rate = 50.0").unwrap();
        assert_eq!(fees.base_fee, 2.0);
        assert_eq!(fees.small_rate, 10.0);
        assert_eq!(fees.rate(SpotSize::Large), 50.0);
    }
}
