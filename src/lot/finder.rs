//! Spot search policies

use super::spot::Spot;
use super::vehicle::SizeRequirement;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Policy a floor uses to pick a spot
///
/// Finders only read spot state. The caller still has to park the vehicle
/// and must cope with the chosen spot being taken in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpotFinder {
    /// Prefer an exact size match, then the first spot that fits
    #[default]
    BestFit,
    /// First spot that fits, in floor order
    FirstFit,
}

impl SpotFinder {
    /// Pick a spot for `requirement` from `spots`
    pub fn find_spot<'a>(
        &self,
        spots: &'a [Arc<Spot>],
        requirement: &impl SizeRequirement,
    ) -> Option<&'a Arc<Spot>> {
        match self {
            SpotFinder::BestFit => {
                let required = requirement.required_size();
                // Exact size first; otherwise whatever fits first in floor
                // order, not the smallest fitting size overall.
                spots
                    .iter()
                    .find(|spot| spot.size() == required && spot.can_fit(requirement))
                    .or_else(|| spots.iter().find(|spot| spot.can_fit(requirement)))
            }
            SpotFinder::FirstFit => spots.iter().find(|spot| spot.can_fit(requirement)),
        }
    }
}

impl fmt::Display for SpotFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotFinder::BestFit => f.write_str("best-fit"),
            SpotFinder::FirstFit => f.write_str("first-fit"),
        }
    }
}

impl FromStr for SpotFinder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "best-fit" | "bestfit" => Ok(SpotFinder::BestFit),
            "first-fit" | "firstfit" => Ok(SpotFinder::FirstFit),
            other => Err(Error::InvalidArgument(format!(
                "Unknown spot finder: {}",
                other
            ))),
        }
    }
}
