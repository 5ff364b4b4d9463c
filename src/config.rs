//! Lot layout configuration
//!
//! A lot is described in TOML:
//!
//! ```toml
//! name = "Downtown Parking"
//! finder = "best-fit"
//!
//! [[floors]]
//! small = 5
//! medium = 8
//! large = 3
//!
//! [[floors]]
//! finder = "first-fit"
//! medium = 10
//!
//! [fees]
//! base_fee = 5.0
//! medium_rate = 20.0
//! ```
//!
//! Files are loaded through `config`, so scalar settings can be overridden
//! from the environment (`LOTKEEPER_NAME`, `LOTKEEPER_FEES__BASE_FEE`, ...).

use crate::error::{Error, Result};
use crate::lot::{HourlyFee, ParkingLot, Spot, SpotFinder, SpotSize};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Spots on one floor, by size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorConfig {
    /// Overrides the lot-wide finder for this floor
    #[serde(default)]
    pub finder: Option<SpotFinder>,
    #[serde(default)]
    pub small: usize,
    #[serde(default)]
    pub medium: usize,
    #[serde(default)]
    pub large: usize,
}

impl FloorConfig {
    pub fn new(small: usize, medium: usize, large: usize) -> Self {
        Self {
            finder: None,
            small,
            medium,
            large,
        }
    }

    fn count(&self, size: SpotSize) -> usize {
        match size {
            SpotSize::Small => self.small,
            SpotSize::Medium => self.medium,
            SpotSize::Large => self.large,
        }
    }
}

/// Whole-lot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotConfig {
    pub name: String,
    #[serde(default)]
    pub finder: SpotFinder,
    pub floors: Vec<FloorConfig>,
    #[serde(default)]
    pub fees: HourlyFee,
}

impl Default for LotConfig {
    /// Three mixed floors, the demo layout
    fn default() -> Self {
        Self {
            name: "Downtown Parking".to_string(),
            finder: SpotFinder::BestFit,
            floors: vec![
                FloorConfig::new(5, 8, 3),
                FloorConfig::new(3, 10, 2),
                FloorConfig::new(4, 6, 4),
            ],
            fees: HourlyFee::default(),
        }
    }
}

impl LotConfig {
    /// Load from a file, layered with `LOTKEEPER_*` environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let lot_config: LotConfig = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("LOTKEEPER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<LotConfig>())
            .map_err(|e| Error::Config(format!("Failed to load {}: {}", path.display(), e)))?;

        lot_config.validate()?;
        info!(path = %path.display(), lot = %lot_config.name, "Configuration loaded");
        Ok(lot_config)
    }

    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let lot_config: LotConfig =
            toml::from_str(s).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        lot_config.validate()?;
        Ok(lot_config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.floors.is_empty() {
            return Err(Error::Config(format!(
                "Lot '{}' must define at least one floor",
                self.name
            )));
        }
        if self.fees.base_fee < 0.0 || SpotSize::ALL.iter().any(|&s| self.fees.rate(s) < 0.0) {
            return Err(Error::Config("Fees must not be negative".to_string()));
        }
        Ok(())
    }

    /// Build a lot with every configured spot in place
    ///
    /// Spot ids follow `F{floor}-{S|M|L}{n}`, small spots first on each floor.
    pub fn build(&self) -> Result<ParkingLot> {
        self.validate()?;

        let lot = ParkingLot::with_options(
            self.name.clone(),
            self.floors.len(),
            self.finder,
            Arc::new(self.fees.clone()),
        )?;

        for (index, floor_config) in self.floors.iter().enumerate() {
            let number = index + 1;
            if let Some(finder) = floor_config.finder {
                lot.set_floor_finder(number, finder)?;
            }
            for size in SpotSize::ALL {
                for n in 1..=floor_config.count(size) {
                    let id = format!("F{}-{}{}", number, size.code(), n);
                    lot.add_spot(number, Spot::new(id, size, number))?;
                }
            }
        }

        info!(lot = %lot.name(), capacity = lot.total_capacity(), "Lot built from configuration");
        Ok(lot)
    }
}
