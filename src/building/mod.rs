pub mod floors;
pub mod geometry;
pub mod input;
pub mod types;

pub use floors::{FloorCount, FloorSource};
pub use geometry::{GeometryMetrics, LatLon};
pub use input::{load_buildings_json, sample_district};
pub use types::{Building, BuildingProfile, BuildingType, RawBuilding};
