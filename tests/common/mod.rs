//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;

use footprint_synth::building::RawBuilding;
use footprint_synth::config::ScenarioConfig;
use footprint_synth::engine::Orchestrator;

/// Baseline scenario shortened to `days` days from 1 April 2024 (a Monday).
pub fn scenario(seed: u64, days: u64, stations: u32) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::baseline();
    let start = NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date");
    cfg.generation.start_date = start;
    cfg.generation.end_date = start + chrono::Days::new(days - 1);
    cfg.generation.seed = Some(seed);
    cfg.generation.weather_stations = stations;
    cfg
}

pub fn orchestrator(cfg: &ScenarioConfig) -> Orchestrator {
    Orchestrator::from_config(cfg).expect("scenario builds an orchestrator")
}

/// An axis-aligned footprint of `dlat` by `dlon` degrees.
pub fn rect_building(
    source_id: &str,
    building_type: &str,
    lat: f64,
    lon: f64,
    dlat: f64,
    dlon: f64,
    floors: Option<u32>,
) -> RawBuilding {
    RawBuilding {
        source_id: source_id.to_string(),
        building_type: Some(building_type.to_string()),
        footprint: vec![
            [lat, lon],
            [lat, lon + dlon],
            [lat + dlat, lon + dlon],
            [lat + dlat, lon],
        ],
        floors,
        ..RawBuilding::default()
    }
}

/// Roughly 120 m² two-storey house.
pub fn small_house() -> RawBuilding {
    rect_building("way/9001", "house", 3.139, 101.6869, 0.0001, 0.0001, Some(2))
}

/// Roughly 400 m² eight-storey office.
pub fn office_tower() -> RawBuilding {
    rect_building("way/9002", "office", 3.140, 101.6875, 0.00018, 0.00018, Some(8))
}

/// Collinear footprint that encloses no area.
pub fn degenerate_building() -> RawBuilding {
    RawBuilding {
        source_id: "way/9999".to_string(),
        building_type: Some("house".to_string()),
        footprint: vec![[3.0, 101.0], [3.0, 101.001], [3.0, 101.002]],
        ..RawBuilding::default()
    }
}
