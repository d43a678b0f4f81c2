//! Shared seam for the consumption generators.

use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};
use rand::Rng;

use crate::building::BuildingProfile;
use crate::climate::ClimateProfile;
use crate::engine::time_grid::{TimeGrid, TimeGridIter};
use crate::engine::types::ConsumptionPoint;
use crate::factors::{
    BaseFactors, FactorBreakdown, Utility, UtilityProfile, temporal_factors, utility_profile,
};
use crate::random::{RandomSource, Stream, StreamKey};

/// A utility-specific consumption model.
///
/// Implementors only supply the utility-specific term of the factor
/// chain; base sizing, temporal modulation and noise are shared.
pub trait ConsumptionModel: Send + Sync {
    /// Utility this model produces.
    fn utility(&self) -> Utility;

    /// Utility-specific multiplier for a building at an hour of day.
    fn utility_specific(
        &self,
        building: &BuildingProfile,
        profile: &UtilityProfile,
        hour: u32,
    ) -> f64;

    /// Factor chain for one timestamp with a given noise multiplier.
    fn breakdown(
        &self,
        building: &BuildingProfile,
        climate: &ClimateProfile,
        timestamp: NaiveDateTime,
        noise: f64,
    ) -> FactorBreakdown {
        let profile = utility_profile(building.building_type, self.utility());
        let (hour, day, season) = temporal_factors(profile, climate, timestamp);
        FactorBreakdown {
            base: BaseFactors::for_building(building, self.utility()),
            hour,
            day,
            season,
            utility_specific: self.utility_specific(building, profile, timestamp.hour()),
            noise,
        }
    }

    /// Lazily generates one value per grid timestamp.
    ///
    /// The series can be regenerated any number of times and yields the
    /// same values for the same random source.
    fn generate<'a>(
        &'a self,
        building: &'a BuildingProfile,
        grid: &TimeGrid,
        climate: &'a ClimateProfile,
        source: &'a dyn RandomSource,
    ) -> ConsumptionSeries<'a, Self>
    where
        Self: Sized,
    {
        ConsumptionSeries {
            model: self,
            building,
            climate,
            source,
            profile: utility_profile(building.building_type, self.utility()),
            base: BaseFactors::for_building(building, self.utility()),
            timestamps: grid.iter(),
        }
    }
}

/// Random stream backing a utility's noise.
pub fn noise_stream(utility: Utility) -> Stream {
    match utility {
        Utility::Electricity => Stream::Electricity,
        Utility::Water => Stream::Water,
    }
}

/// Multiplicative noise drawn uniformly from `[1 - half_width, 1 + half_width]`.
pub fn uniform_noise(rng: &mut impl Rng, half_width: f64) -> f64 {
    if half_width <= 0.0 {
        return 1.0;
    }
    rng.random_range((1.0 - half_width)..=(1.0 + half_width))
}

/// Iterator over a building's consumption series.
pub struct ConsumptionSeries<'a, M: ConsumptionModel> {
    model: &'a M,
    building: &'a BuildingProfile,
    climate: &'a ClimateProfile,
    source: &'a dyn RandomSource,
    profile: &'static UtilityProfile,
    base: BaseFactors,
    timestamps: TimeGridIter,
}

impl<M: ConsumptionModel> Iterator for ConsumptionSeries<'_, M> {
    type Item = ConsumptionPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, timestamp) = self.timestamps.next()?;
        let key = StreamKey::new(
            noise_stream(self.model.utility()),
            self.building.hash,
            index as u64,
        );
        let mut rng = self.source.rng(key);
        let (hour, day, season) = temporal_factors(self.profile, self.climate, timestamp);
        let breakdown = FactorBreakdown {
            base: self.base,
            hour,
            day,
            season,
            utility_specific: self.model.utility_specific(
                self.building,
                self.profile,
                timestamp.hour(),
            ),
            noise: uniform_noise(&mut rng, self.profile.noise),
        };
        Some(ConsumptionPoint {
            building_id: Arc::clone(&self.building.id),
            timestamp,
            value: breakdown.value().max(0.0),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.timestamps.size_hint()
    }
}

impl<M: ConsumptionModel> ExactSizeIterator for ConsumptionSeries<'_, M> {}
