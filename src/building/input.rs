//! Building input: JSON footprint files and a built-in sample district.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::types::RawBuilding;
use crate::error::EngineError;

#[derive(Deserialize)]
#[serde(untagged)]
enum BuildingFile {
    List(Vec<RawBuilding>),
    Wrapped { buildings: Vec<RawBuilding> },
}

/// Reads raw buildings from a JSON file.
///
/// Accepts either a bare array of records or an object with a
/// `buildings` array.
///
/// # Errors
///
/// Returns [`EngineError::Io`] if the file cannot be read and
/// [`EngineError::InvalidInput`] if the JSON does not match the record shape.
pub fn load_buildings_json(path: &Path) -> Result<Vec<RawBuilding>, EngineError> {
    let content = fs::read_to_string(path)?;
    parse_buildings_json(&content)
}

/// Parses raw buildings from a JSON string.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] on malformed JSON.
pub fn parse_buildings_json(content: &str) -> Result<Vec<RawBuilding>, EngineError> {
    let file: BuildingFile = serde_json::from_str(content)?;
    Ok(match file {
        BuildingFile::List(list) => list,
        BuildingFile::Wrapped { buildings } => buildings,
    })
}

/// A small mixed-use district near central Kuala Lumpur.
///
/// Covers every building type plus one unsupported tag and one footprint
/// with only a declared area.
pub fn sample_district() -> Vec<RawBuilding> {
    let rect = |lat: f64, lon: f64, dlat: f64, dlon: f64| {
        vec![
            [lat, lon],
            [lat, lon + dlon],
            [lat + dlat, lon + dlon],
            [lat + dlat, lon],
        ]
    };
    let record = |id: &str, ty: &str, footprint: Vec<[f64; 2]>, floors: Option<u32>| RawBuilding {
        source_id: id.to_string(),
        building_type: Some(ty.to_string()),
        footprint,
        floors,
        ..RawBuilding::default()
    };

    let mut district = vec![
        record("way/1001", "house", rect(3.1390, 101.6869, 0.0001, 0.0001), Some(2)),
        record("way/1002", "apartments", rect(3.1393, 101.6869, 0.0003, 0.0002), None),
        record("way/1003", "office", rect(3.1400, 101.6875, 0.00018, 0.00018), Some(8)),
        record("way/1004", "mall", rect(3.1405, 101.6880, 0.0006, 0.0005), Some(3)),
        record("way/1005", "factory", rect(3.1360, 101.6840, 0.0008, 0.0012), None),
        record("way/1006", "school", rect(3.1380, 101.6890, 0.0004, 0.0006), Some(2)),
        record("way/1007", "hospital", rect(3.1420, 101.6900, 0.0007, 0.0007), None),
        record("way/1008", "mosque", rect(3.1385, 101.6860, 0.0003, 0.0003), Some(1)),
        record("way/1009", "kiosk", rect(3.1391, 101.6866, 0.00003, 0.00004), None),
        record("way/1010", "hangar", rect(3.1370, 101.6850, 0.0003, 0.0006), None),
    ];

    let mut tower = record("way/1011", "office", rect(3.1410, 101.6865, 0.0003, 0.0003), None);
    tower.tags.insert("height".into(), "84 m".into());
    district.push(tower);

    district.push(RawBuilding {
        source_id: "node/2001".to_string(),
        name: Some("Surau Taman Melati".to_string()),
        building_type: Some("religious".to_string()),
        surface_area_m2: Some(180.0),
        ..RawBuilding::default()
    });

    district
}
