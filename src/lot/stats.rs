//! Point-in-time availability reports
//!
//! Snapshots are read without the lot gate, so under live traffic they are
//! eventually consistent rather than linearized with park/exit.

use super::finder::SpotFinder;
use super::spot::SpotSize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Spot counts per size class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeCounts {
    pub small: usize,
    pub medium: usize,
    pub large: usize,
}

impl SizeCounts {
    pub fn get(&self, size: SpotSize) -> usize {
        match size {
            SpotSize::Small => self.small,
            SpotSize::Medium => self.medium,
            SpotSize::Large => self.large,
        }
    }

    pub fn add(&mut self, size: SpotSize) {
        match size {
            SpotSize::Small => self.small += 1,
            SpotSize::Medium => self.medium += 1,
            SpotSize::Large => self.large += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.small + self.medium + self.large
    }
}

/// Availability of a single floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorSnapshot {
    pub number: usize,
    pub finder: SpotFinder,
    pub capacity: usize,
    pub available: SizeCounts,
}

impl FloorSnapshot {
    pub fn occupied(&self) -> usize {
        self.capacity - self.available.total()
    }
}

/// Availability of the whole lot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotSnapshot {
    pub name: String,
    pub taken_at: DateTime<Utc>,
    pub floors: Vec<FloorSnapshot>,
    pub total_capacity: usize,
    pub total_available: usize,
    pub active_tickets: usize,
}
