//! Consumption factor model.
//!
//! Every consumption value is the product of a fixed chain of factors:
//! base rate, floor efficiency, shape, size, hour of day, day of week,
//! season, the utility-specific terms, then noise. [`FactorBreakdown`]
//! holds the chain for one building and timestamp so callers can inspect
//! each term.

pub mod profiles;
pub mod table;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

pub use profiles::{UtilityProfile, utility_profile};

use crate::building::BuildingProfile;
use crate::climate::ClimateProfile;

/// Metered utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Utility {
    Electricity,
    Water,
}

impl Utility {
    /// Unit of one consumption value.
    pub fn unit(self) -> &'static str {
        match self {
            Utility::Electricity => "kWh",
            Utility::Water => "L",
        }
    }
}

/// Time-independent part of the chain for one building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaseFactors {
    /// Daily consumption per m² of floor area.
    pub base_rate: f64,
    /// Gross floor area (m²).
    pub floor_area_m2: f64,
    pub floor_efficiency: f64,
    pub shape: f64,
    pub size: f64,
}

impl BaseFactors {
    /// Resolves the static factors for a building.
    pub fn for_building(building: &BuildingProfile, utility: Utility) -> Self {
        let profile = utility_profile(building.building_type, utility);
        let floor_area_m2 = building.total_floor_area_m2();
        Self {
            base_rate: profile.base_rate,
            floor_area_m2,
            floor_efficiency: floor_efficiency(profile, building.floors.floors),
            shape: 1.0 + (building.geometry.shape_factor - 1.0) * profile.shape_coefficient,
            size: table::size_factor(profile.size_bands, floor_area_m2),
        }
    }

    /// Daily consumption before temporal modulation.
    pub fn daily(&self) -> f64 {
        self.base_rate * self.floor_area_m2 * self.floor_efficiency * self.shape * self.size
    }

    /// Per-hour consumption before temporal modulation.
    pub fn hourly(&self) -> f64 {
        self.daily() / 24.0
    }
}

/// Full factor chain for one building at one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorBreakdown {
    pub base: BaseFactors,
    pub hour: f64,
    pub day: f64,
    pub season: f64,
    /// Product of the utility-specific terms (floors impact, pressure, distribution).
    pub utility_specific: f64,
    pub noise: f64,
}

impl FactorBreakdown {
    /// Hourly value with every factor applied in chain order.
    pub fn value(&self) -> f64 {
        self.base.hourly() * self.hour * self.day * self.season * self.utility_specific * self.noise
    }
}

/// Hour, day, and season multipliers for a timestamp.
pub fn temporal_factors(
    profile: &UtilityProfile,
    climate: &ClimateProfile,
    timestamp: NaiveDateTime,
) -> (f64, f64, f64) {
    (
        profile.hourly.at(timestamp.hour()),
        profile
            .weekly
            .at(timestamp.weekday().num_days_from_monday()),
        profile.seasonal.at(climate.season(timestamp.month())),
    )
}

/// `1 + (floors - 1) * efficiency`.
pub fn floor_efficiency(profile: &UtilityProfile, floors: u32) -> f64 {
    1.0 + f64::from(floors.saturating_sub(1)) * profile.floor_efficiency
}

/// Vertical-transport load that varies by hour (lifts, pumps, HVAC risers).
///
/// Single-storey buildings return 1.0.
pub fn floors_impact(profile: &UtilityProfile, floors: u32, hour: u32) -> f64 {
    if floors <= 1 {
        return 1.0;
    }
    (1.0 + f64::from(floors - 1) * profile.floor_impact_per_floor) * profile.floor_peak.at(hour)
}

/// Pumping requirement for delivering water up the building.
pub fn pressure_factor(floors: u32) -> f64 {
    if floors <= 1 {
        return 1.0;
    }
    let mut factor = 1.0 + f64::from(floors - 1) * 0.05;
    if floors > 5 {
        factor *= 1.1;
    }
    if floors > 10 {
        factor *= 1.15;
    }
    factor
}

/// Pipe-network overhead of irregular footprints, in `[1, 2]`.
pub fn distribution_complexity(shape_factor: f64) -> f64 {
    (1.0 + (shape_factor - 1.0) * 0.08).clamp(1.0, 2.0)
}
