//! Electricity consumption model.

use super::types::ConsumptionModel;
use crate::building::BuildingProfile;
use crate::factors::{Utility, UtilityProfile, floors_impact};

/// Hourly electricity demand (kWh) driven by building type, geometry and time.
///
/// The utility-specific term is the floors impact: vertical transport and
/// HVAC load that rises with storeys and peaks at occupancy changeovers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElectricityGenerator;

impl ConsumptionModel for ElectricityGenerator {
    fn utility(&self) -> Utility {
        Utility::Electricity
    }

    fn utility_specific(
        &self,
        building: &BuildingProfile,
        profile: &UtilityProfile,
        hour: u32,
    ) -> f64 {
        floors_impact(profile, building.floors.floors, hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{Building, RawBuilding};
    use crate::climate::ClimateProfile;
    use crate::engine::time_grid::{Frequency, TimeGrid};
    use crate::random::SeededSource;
    use chrono::{NaiveDate, Timelike};

    fn office() -> BuildingProfile {
        Building::from_raw(RawBuilding {
            source_id: "way/500".into(),
            building_type: Some("office".into()),
            surface_area_m2: Some(400.0),
            floors: Some(8),
            ..RawBuilding::default()
        })
        .profile(&SeededSource::new(42))
        .expect("declared area is valid")
    }

    fn week() -> TimeGrid {
        // Monday 1 April to Sunday 7 April 2024.
        TimeGrid::from_dates(
            NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid"),
            NaiveDate::from_ymd_opt(2024, 4, 7).expect("valid"),
            Frequency::HOURLY,
        )
        .expect("valid range")
    }

    #[test]
    fn one_value_per_timestamp_and_non_negative() {
        let building = office();
        let grid = week();
        let climate = ClimateProfile::default();
        let source = SeededSource::new(42);
        let series: Vec<_> = ElectricityGenerator
            .generate(&building, &grid, &climate, &source)
            .collect();
        assert_eq!(series.len(), grid.len());
        assert!(series.iter().all(|p| p.value >= 0.0));
        assert!(series.iter().all(|p| p.building_id == building.id));
    }

    #[test]
    fn regeneration_is_deterministic() {
        let building = office();
        let grid = week();
        let climate = ClimateProfile::default();
        let source = SeededSource::new(7);
        let a: Vec<_> = ElectricityGenerator
            .generate(&building, &grid, &climate, &source)
            .collect();
        let b: Vec<_> = ElectricityGenerator
            .generate(&building, &grid, &climate, &source)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn office_workday_peak_exceeds_night() {
        let building = office();
        let grid = week();
        let climate = ClimateProfile::default();
        let source = SeededSource::new(42);
        let series: Vec<_> = ElectricityGenerator
            .generate(&building, &grid, &climate, &source)
            .collect();
        // Monday 10:00 against Monday 02:00.
        let day = series[10].value;
        let night = series[2].value;
        assert_eq!(series[10].timestamp.hour(), 10);
        assert!(day > 5.0 * night, "day {day} night {night}");
    }

    #[test]
    fn noise_band_bounds_values() {
        let building = office();
        let climate = ClimateProfile::default();
        let grid = week();
        let source = SeededSource::new(3);
        for point in ElectricityGenerator.generate(&building, &grid, &climate, &source) {
            let center = ElectricityGenerator
                .breakdown(&building, &climate, point.timestamp, 1.0)
                .value();
            assert!(point.value >= center * 0.9 - 1e-9);
            assert!(point.value <= center * 1.1 + 1e-9);
        }
    }
}
