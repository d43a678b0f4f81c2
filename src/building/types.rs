//! Building records: raw input, normalized building, and resolved profile.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::floors::{FloorCount, FloorHints, FloorSource, resolve_floors};
use super::geometry::{self, GeometryMetrics, LatLon};
use crate::error::EngineError;
use crate::random::{RandomSource, stable_hash};

/// Building usage category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingType {
    Residential,
    Commercial,
    Office,
    Industrial,
    School,
    Hospital,
    Religious,
    Other,
}

impl BuildingType {
    pub const ALL: [BuildingType; 8] = [
        BuildingType::Residential,
        BuildingType::Commercial,
        BuildingType::Office,
        BuildingType::Industrial,
        BuildingType::School,
        BuildingType::Hospital,
        BuildingType::Religious,
        BuildingType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildingType::Residential => "residential",
            BuildingType::Commercial => "commercial",
            BuildingType::Office => "office",
            BuildingType::Industrial => "industrial",
            BuildingType::School => "school",
            BuildingType::Hospital => "hospital",
            BuildingType::Religious => "religious",
            BuildingType::Other => "other",
        }
    }

    /// Single-letter prefix used in building ids.
    pub fn prefix(self) -> char {
        match self {
            BuildingType::Residential => 'R',
            BuildingType::Commercial => 'C',
            BuildingType::Office => 'O',
            BuildingType::Industrial => 'I',
            BuildingType::School => 'S',
            BuildingType::Hospital => 'H',
            BuildingType::Religious => 'W',
            BuildingType::Other => 'X',
        }
    }

    /// Normalizes a raw map tag (e.g. `"apartments"`, `"mall"`, `"mosque"`).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnsupportedBuildingType`] for tags with no
    /// known category.
    pub fn from_tag(tag: &str) -> Result<Self, EngineError> {
        let normalized = tag.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        let ty = match normalized.as_str() {
            "residential" | "house" | "apartments" | "apartment" | "detached"
            | "semidetached_house" | "terrace" | "bungalow" | "dormitory" | "flats" => {
                BuildingType::Residential
            }
            "commercial" | "retail" | "shop" | "shops" | "mall" | "supermarket" | "kiosk"
            | "hotel" | "restaurant" => BuildingType::Commercial,
            "office" | "government" | "civic" | "public" | "bank" => BuildingType::Office,
            "industrial" | "factory" | "warehouse" | "manufacture" | "storage_tank" => {
                BuildingType::Industrial
            }
            "school" | "university" | "college" | "kindergarten" | "education" => {
                BuildingType::School
            }
            "hospital" | "clinic" | "healthcare" => BuildingType::Hospital,
            "religious" | "mosque" | "temple" | "church" | "chapel" | "shrine"
            | "place_of_worship" => BuildingType::Religious,
            "other" | "yes" | "building" => BuildingType::Other,
            _ => return Err(EngineError::UnsupportedBuildingType(tag.to_string())),
        };
        Ok(ty)
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildingType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

/// A building record as supplied by the geometry-input collaborator.
///
/// `footprint` holds `[lat, lon]` pairs. `tags` carries free-form map
/// attributes such as `building:levels` or `height`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBuilding {
    pub source_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub building_type: Option<String>,
    #[serde(default)]
    pub footprint: Vec<[f64; 2]>,
    #[serde(default)]
    pub surface_area_m2: Option<f64>,
    #[serde(default)]
    pub floors: Option<u32>,
    #[serde(default)]
    pub height_m: Option<f64>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// A normalized building with lazily derived geometry and floors.
///
/// Geometry and floor count are computed on first access and memoized;
/// the cache is safe to populate from any thread.
pub struct Building {
    id: Arc<str>,
    source_id: String,
    name: Option<String>,
    building_type: BuildingType,
    type_fallback: bool,
    hash: u64,
    ring: Vec<LatLon>,
    declared_area_m2: Option<f64>,
    floor_hints: FloorHints,
    geometry: OnceLock<Result<GeometryMetrics, String>>,
    floors: OnceLock<FloorCount>,
}

impl Building {
    /// Normalizes a raw record.
    ///
    /// Unknown type tags fall back to [`BuildingType::Other`] with a
    /// warning; a missing tag is `Other` without one.
    pub fn from_raw(raw: RawBuilding) -> Self {
        let hash = stable_hash(&raw.source_id);
        let type_tag = raw
            .building_type
            .clone()
            .or_else(|| raw.tags.get("building").cloned());
        let (building_type, type_fallback) = match type_tag.as_deref().map(BuildingType::from_tag)
        {
            Some(Ok(ty)) => (ty, false),
            Some(Err(err)) => {
                warn!(source_id = %raw.source_id, %err, "falling back to generic factor table");
                (BuildingType::Other, true)
            }
            None => (BuildingType::Other, false),
        };

        let ring = raw
            .footprint
            .iter()
            .map(|&[lat, lon]| LatLon::new(lat, lon))
            .collect();

        let floor_hints = FloorHints {
            explicit: raw
                .floors
                .map(|f| f.to_string())
                .or_else(|| raw.tags.get("building:levels").cloned())
                .or_else(|| raw.tags.get("levels").cloned()),
            height: raw
                .height_m
                .map(|h| h.to_string())
                .or_else(|| raw.tags.get("height").cloned()),
        };

        let id: Arc<str> = Arc::from(format!(
            "{}{:012X}",
            building_type.prefix(),
            hash & 0xFFFF_FFFF_FFFF
        ));

        Self {
            id,
            source_id: raw.source_id,
            name: raw.name,
            building_type,
            type_fallback,
            hash,
            ring,
            declared_area_m2: raw.surface_area_m2,
            floor_hints,
            geometry: OnceLock::new(),
            floors: OnceLock::new(),
        }
    }

    pub fn id(&self) -> &Arc<str> {
        &self.id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn building_type(&self) -> BuildingType {
        self.building_type
    }

    /// True when the raw type tag was unsupported and `Other` was used.
    pub fn type_fallback(&self) -> bool {
        self.type_fallback
    }

    /// Stable hash of the source identifier.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Footprint geometry, computed once.
    ///
    /// The ring is tried first; a declared area is used when the ring is
    /// absent or unusable.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DegeneratePolygon`] if neither the ring nor a
    /// declared area yields usable geometry.
    pub fn geometry(&self) -> Result<&GeometryMetrics, EngineError> {
        self.geometry
            .get_or_init(|| self.resolve_geometry())
            .as_ref()
            .map_err(|reason| EngineError::DegeneratePolygon {
                building_id: self.id.to_string(),
                reason: reason.clone(),
            })
    }

    fn resolve_geometry(&self) -> Result<GeometryMetrics, String> {
        let ring_error = if self.ring.is_empty() {
            None
        } else {
            match geometry::compute_ring(&self.ring) {
                Ok(metrics) => return Ok(metrics),
                Err(reason) => Some(reason),
            }
        };
        match (self.declared_area_m2, ring_error) {
            (Some(area), Some(reason)) => {
                warn!(
                    building_id = %self.id,
                    %reason,
                    declared_m2 = area,
                    "unusable footprint ring, using declared area"
                );
                geometry::from_declared_area(area).map_err(|e| format!("{reason}; {e}"))
            }
            (Some(area), None) => geometry::from_declared_area(area),
            (None, Some(reason)) => Err(reason),
            (None, None) => Err("no footprint ring or declared area".to_string()),
        }
    }

    /// Floor count, resolved once.
    ///
    /// A sampled count draws from the floor stream of `source`.
    pub fn floors(&self, source: &dyn RandomSource) -> FloorCount {
        *self.floors.get_or_init(|| {
            resolve_floors(&self.floor_hints, self.building_type, self.hash, source)
        })
    }

    /// Resolves geometry and floors into a generator-ready profile.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError::DegeneratePolygon`] from [`Building::geometry`].
    pub fn profile(&self, source: &dyn RandomSource) -> Result<BuildingProfile, EngineError> {
        let geometry = *self.geometry()?;
        let floors = self.floors(source);
        if geometry.area_clamped {
            warn!(
                building_id = %self.id,
                area_m2 = geometry.area_m2,
                used_m2 = geometry.consumption_area_m2,
                "footprint area outside plausible range"
            );
        }
        Ok(BuildingProfile {
            id: Arc::clone(&self.id),
            building_type: self.building_type,
            hash: self.hash,
            geometry,
            floors,
            quality_score: quality_score(&geometry, floors, self.type_fallback),
            type_fallback: self.type_fallback,
        })
    }
}

impl fmt::Debug for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Building")
            .field("id", &self.id)
            .field("source_id", &self.source_id)
            .field("building_type", &self.building_type)
            .finish_non_exhaustive()
    }
}

/// A building with every derived attribute resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingProfile {
    pub id: Arc<str>,
    pub building_type: BuildingType,
    #[serde(skip)]
    pub hash: u64,
    pub geometry: GeometryMetrics,
    pub floors: FloorCount,
    pub quality_score: f64,
    pub type_fallback: bool,
}

impl BuildingProfile {
    /// Gross floor area used for sizing (m²).
    pub fn total_floor_area_m2(&self) -> f64 {
        self.geometry.consumption_area_m2 * f64::from(self.floors.floors)
    }
}

/// Data-quality score in `[0, 1]`; 1.0 means nothing was estimated.
pub fn quality_score(geometry: &GeometryMetrics, floors: FloorCount, type_fallback: bool) -> f64 {
    let mut score = 1.0;
    score -= match floors.source {
        FloorSource::Explicit => 0.0,
        FloorSource::Height => 0.1,
        FloorSource::Sampled => 0.3,
    };
    if !geometry.has_precise_geometry {
        score -= 0.2;
    }
    if type_fallback {
        score -= 0.2;
    }
    if geometry.area_clamped {
        score -= 0.2;
    }
    f64::clamp(score, 0.0, 1.0)
}
