//! Floor-count resolution.

use rand::seq::IndexedRandom;
use serde::Serialize;

use super::types::BuildingType;
use crate::random::{RandomSource, Stream, StreamKey};

/// Typical storey height used to convert a height tag into floors.
pub const METERS_PER_FLOOR: f64 = 3.5;
/// Explicit floor counts above this are treated as bad data.
pub const MAX_FLOORS: u32 = 200;

/// Where a floor count came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorSource {
    Explicit,
    Height,
    Sampled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FloorCount {
    pub floors: u32,
    pub source: FloorSource,
}

/// Raw floor evidence collected from a building record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloorHints {
    /// Explicit count (a `floors` field or `building:levels` / `levels` tag).
    pub explicit: Option<String>,
    /// Height in meters (a `height_m` field or `height` tag).
    pub height: Option<String>,
}

/// Resolves the floor count for a building.
///
/// Order: a valid explicit count in `1..=200`, then height divided by
/// 3.5 m, then a weighted draw from the type's distribution on the
/// `source` floor stream keyed by the building hash. The same source and
/// hash always yield the same draw.
pub fn resolve_floors(
    hints: &FloorHints,
    building_type: BuildingType,
    hash: u64,
    source: &dyn RandomSource,
) -> FloorCount {
    if let Some(floors) = hints
        .explicit
        .as_deref()
        .and_then(parse_leading_number)
        .filter(|v| v.fract() == 0.0 && (1.0..=MAX_FLOORS as f64).contains(v))
    {
        return FloorCount {
            floors: floors as u32,
            source: FloorSource::Explicit,
        };
    }

    if let Some(height) = hints
        .height
        .as_deref()
        .and_then(parse_leading_number)
        .filter(|h| *h > 0.0)
    {
        let floors = (height / METERS_PER_FLOOR).round().clamp(1.0, MAX_FLOORS as f64);
        return FloorCount {
            floors: floors as u32,
            source: FloorSource::Height,
        };
    }

    FloorCount {
        floors: sample_floors(building_type, hash, source),
        source: FloorSource::Sampled,
    }
}

/// Parses the leading number of a tag value such as `"12"`, `"10.5 m"` or `"3;4"`.
pub fn parse_leading_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let end = trimmed
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || c == '.'))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn floor_distribution(building_type: BuildingType) -> &'static [(u32, f64)] {
    match building_type {
        BuildingType::Residential => &[(1, 0.6), (2, 0.3), (3, 0.1)],
        BuildingType::Office | BuildingType::Commercial => &[
            (1, 0.30),
            (2, 0.20),
            (3, 0.15),
            (4, 0.10),
            (5, 0.08),
            (6, 0.06),
            (7, 0.04),
            (8, 0.03),
            (9, 0.02),
            (10, 0.02),
        ],
        BuildingType::Industrial => &[(1, 0.8), (2, 0.2)],
        BuildingType::Hospital => &[(2, 0.1), (3, 0.3), (4, 0.3), (5, 0.2), (6, 0.1)],
        BuildingType::School | BuildingType::Religious | BuildingType::Other => &[(1, 1.0)],
    }
}

fn sample_floors(building_type: BuildingType, hash: u64, source: &dyn RandomSource) -> u32 {
    let mut rng = source.rng(StreamKey::new(Stream::Floors, hash, 0));
    floor_distribution(building_type)
        .choose_weighted(&mut rng, |&(_, w)| w)
        .map_or(1, |&(floors, _)| floors)
}
