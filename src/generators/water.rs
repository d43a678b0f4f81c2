//! Water consumption model.

use super::types::ConsumptionModel;
use crate::building::BuildingProfile;
use crate::factors::{
    Utility, UtilityProfile, distribution_complexity, floors_impact, pressure_factor,
};

/// Hourly water demand (L).
///
/// On top of the floors impact, tall buildings pay a pumping-pressure
/// premium and irregular footprints a distribution-network premium.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterGenerator;

impl ConsumptionModel for WaterGenerator {
    fn utility(&self) -> Utility {
        Utility::Water
    }

    fn utility_specific(
        &self,
        building: &BuildingProfile,
        profile: &UtilityProfile,
        hour: u32,
    ) -> f64 {
        let floors = building.floors.floors;
        floors_impact(profile, floors, hour)
            * pressure_factor(floors)
            * distribution_complexity(building.geometry.shape_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{Building, RawBuilding};
    use crate::climate::ClimateProfile;
    use crate::engine::time_grid::{Frequency, TimeGrid};
    use crate::generators::ElectricityGenerator;
    use crate::random::SeededSource;
    use chrono::NaiveDate;

    fn house(source_id: &str, floors: u32) -> BuildingProfile {
        Building::from_raw(RawBuilding {
            source_id: source_id.into(),
            building_type: Some("residential".into()),
            surface_area_m2: Some(150.0),
            floors: Some(floors),
            ..RawBuilding::default()
        })
        .profile(&SeededSource::new(42))
        .expect("declared area is valid")
    }

    fn day() -> TimeGrid {
        TimeGrid::from_dates(
            NaiveDate::from_ymd_opt(2024, 4, 3).expect("valid"),
            NaiveDate::from_ymd_opt(2024, 4, 3).expect("valid"),
            Frequency::HOURLY,
        )
        .expect("valid range")
    }

    #[test]
    fn morning_peak_exceeds_night_trough() {
        let building = house("way/1", 1);
        let climate = ClimateProfile::default();
        let source = SeededSource::new(42);
        let series: Vec<_> = WaterGenerator
            .generate(&building, &day(), &climate, &source)
            .collect();
        assert_eq!(series.len(), 24);
        assert!(series[7].value > 5.0 * series[3].value);
        assert!(series.iter().all(|p| p.value >= 0.0));
    }

    #[test]
    fn taller_buildings_pay_pressure_premium() {
        let climate = ClimateProfile::default();
        let low = house("way/2", 1);
        let tall = house("way/2", 12);
        let ts = day().get(10).expect("in range");
        let low_specific = WaterGenerator.breakdown(&low, &climate, ts, 1.0).utility_specific;
        let tall_specific = WaterGenerator.breakdown(&tall, &climate, ts, 1.0).utility_specific;
        assert!(tall_specific > low_specific * 1.5);
    }

    #[test]
    fn water_noise_is_independent_of_electricity() {
        let building = house("way/3", 2);
        let climate = ClimateProfile::default();
        let source = SeededSource::new(42);
        let grid = day();
        let water_noise: Vec<f64> = grid
            .iter()
            .zip(WaterGenerator.generate(&building, &grid, &climate, &source))
            .map(|((_, ts), p)| p.value / WaterGenerator.breakdown(&building, &climate, ts, 1.0).value())
            .collect();
        let elec_noise: Vec<f64> = grid
            .iter()
            .zip(ElectricityGenerator.generate(&building, &grid, &climate, &source))
            .map(|((_, ts), p)| {
                p.value / ElectricityGenerator.breakdown(&building, &climate, ts, 1.0).value()
            })
            .collect();
        assert_ne!(water_noise, elec_noise);
        assert!(water_noise.iter().all(|n| (0.85 - 1e-9..=1.15 + 1e-9).contains(n)));
    }

    #[test]
    fn december_draws_less_water_than_april() {
        // Both weeks run Monday to Sunday.
        let week = |y: i32, m: u32, d: u32| {
            let start = NaiveDate::from_ymd_opt(y, m, d).expect("valid");
            TimeGrid::from_dates(start, start + chrono::Days::new(6), Frequency::HOURLY)
                .expect("valid range")
        };
        let building = house("way/4", 2);
        let climate = ClimateProfile::default();
        let source = SeededSource::new(42);
        let total = |grid: &TimeGrid| -> f64 {
            WaterGenerator
                .generate(&building, grid, &climate, &source)
                .map(|p| p.value)
                .sum()
        };
        let wet = total(&week(2024, 12, 2));
        let shoulder = total(&week(2024, 4, 1));
        let ratio = wet / shoulder;
        assert!((0.72..0.88).contains(&ratio), "wet/shoulder ratio {ratio}");
    }
}
