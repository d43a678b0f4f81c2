//! Footprint geometry: area, perimeter, and shape descriptors.
//!
//! Rings are given as latitude/longitude vertices and projected onto a
//! local equirectangular plane (111 km per degree of latitude, scaled by
//! the cosine of the mean latitude for longitude). Area and perimeter are
//! both measured in that plane so the shape factor stays consistent.

use serde::{Deserialize, Serialize};

/// Meters per degree of latitude.
pub const METERS_PER_DEGREE: f64 = 111_000.0;
/// Lower plausibility bound for the area used in consumption sizing.
pub const MIN_AREA_M2: f64 = 10.0;
/// Upper plausibility bound for the area used in consumption sizing.
pub const MAX_AREA_M2: f64 = 100_000.0;
/// Shape factor bounds: 1.0 is a circle, 3.0 covers very elongated footprints.
pub const MIN_SHAPE_FACTOR: f64 = 1.0;
pub const MAX_SHAPE_FACTOR: f64 = 3.0;

const ZERO_AREA_EPSILON_M2: f64 = 1e-6;

/// A footprint vertex in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Derived geometry of one footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryMetrics {
    /// Footprint area as measured (m²).
    pub area_m2: f64,
    /// Footprint perimeter (m).
    pub perimeter_m: f64,
    /// Perimeter relative to an equal-area circle, clamped to [1, 3].
    pub shape_factor: f64,
    /// Isoperimetric quotient `4πA / P²`, 1.0 for a circle.
    pub compactness: f64,
    /// True when derived from a vertex ring rather than a declared area.
    pub has_precise_geometry: bool,
    /// Area used for consumption sizing, clamped to plausibility bounds.
    pub consumption_area_m2: f64,
    /// True when `consumption_area_m2` differs from `area_m2`.
    pub area_clamped: bool,
    /// Vertex centroid of the ring, if one was given.
    pub centroid: Option<LatLon>,
}

/// Computes geometry for a vertex ring.
///
/// The ring is implicitly closed; a repeated closing vertex is accepted.
///
/// # Errors
///
/// Returns a reason string when the ring has non-finite coordinates, fewer
/// than three distinct vertices, or zero area.
pub fn compute_ring(points: &[LatLon]) -> Result<GeometryMetrics, String> {
    let ring = normalize_ring(points)?;
    let projected = project(&ring);
    let area_m2 = shoelace_area(&projected);
    if area_m2 < ZERO_AREA_EPSILON_M2 {
        return Err("ring encloses zero area".to_string());
    }
    let perimeter_m = ring_perimeter(&projected);
    let n = ring.len() as f64;
    let centroid = LatLon::new(
        ring.iter().map(|p| p.lat).sum::<f64>() / n,
        ring.iter().map(|p| p.lon).sum::<f64>() / n,
    );
    Ok(metrics(area_m2, perimeter_m, true, Some(centroid)))
}

/// Builds geometry for a building known only by its declared area.
///
/// The perimeter is that of the equal-area circle, giving a shape factor
/// of exactly 1.0.
///
/// # Errors
///
/// Returns a reason string if the area is not a positive finite number.
pub fn from_declared_area(area_m2: f64) -> Result<GeometryMetrics, String> {
    if !area_m2.is_finite() || area_m2 <= 0.0 {
        return Err(format!("declared area {area_m2} is not positive"));
    }
    let perimeter_m = 2.0 * (std::f64::consts::PI * area_m2).sqrt();
    Ok(metrics(area_m2, perimeter_m, false, None))
}

/// Shape factor `P / (2·√(π·A))`, clamped to [1, 3].
///
/// Returns 1.0 for non-positive area.
pub fn shape_factor(area_m2: f64, perimeter_m: f64) -> f64 {
    if area_m2 <= 0.0 {
        return MIN_SHAPE_FACTOR;
    }
    let raw = perimeter_m / (2.0 * (std::f64::consts::PI * area_m2).sqrt());
    raw.clamp(MIN_SHAPE_FACTOR, MAX_SHAPE_FACTOR)
}

/// Isoperimetric quotient `4πA / P²`.
pub fn compactness(area_m2: f64, perimeter_m: f64) -> f64 {
    if perimeter_m <= 0.0 {
        return 0.0;
    }
    (4.0 * std::f64::consts::PI * area_m2 / (perimeter_m * perimeter_m)).min(1.0)
}

fn metrics(
    area_m2: f64,
    perimeter_m: f64,
    has_precise_geometry: bool,
    centroid: Option<LatLon>,
) -> GeometryMetrics {
    let consumption_area_m2 = area_m2.clamp(MIN_AREA_M2, MAX_AREA_M2);
    GeometryMetrics {
        area_m2,
        perimeter_m,
        shape_factor: shape_factor(area_m2, perimeter_m),
        compactness: compactness(area_m2, perimeter_m),
        has_precise_geometry,
        consumption_area_m2,
        area_clamped: consumption_area_m2 != area_m2,
        centroid,
    }
}

fn normalize_ring(points: &[LatLon]) -> Result<Vec<LatLon>, String> {
    if points
        .iter()
        .any(|p| !p.lat.is_finite() || !p.lon.is_finite())
    {
        return Err("ring contains non-finite coordinates".to_string());
    }
    if points
        .iter()
        .any(|p| p.lat.abs() > 90.0 || p.lon.abs() > 180.0)
    {
        return Err("ring contains out-of-range coordinates".to_string());
    }

    let mut ring: Vec<LatLon> = Vec::with_capacity(points.len());
    for p in points {
        if ring.last() != Some(p) {
            ring.push(*p);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    if ring.len() < 3 {
        return Err(format!(
            "ring has {} distinct vertices, need at least 3",
            ring.len()
        ));
    }
    Ok(ring)
}

fn project(ring: &[LatLon]) -> Vec<(f64, f64)> {
    let mean_lat = ring.iter().map(|p| p.lat).sum::<f64>() / ring.len() as f64;
    let meters_per_lon = METERS_PER_DEGREE * mean_lat.to_radians().cos();
    let origin = ring[0];
    ring.iter()
        .map(|p| {
            (
                (p.lon - origin.lon) * meters_per_lon,
                (p.lat - origin.lat) * METERS_PER_DEGREE,
            )
        })
        .collect()
}

fn shoelace_area(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (x1, y1) = points[i];
            let (x2, y2) = points[(i + 1) % n];
            x1 * y2 - x2 * y1
        })
        .sum();
    twice.abs() / 2.0
}

fn ring_perimeter(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (x1, y1) = points[i];
            let (x2, y2) = points[(i + 1) % n];
            (x2 - x1).hypot(y2 - y1)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAT0: f64 = 3.139;
    const LON0: f64 = 101.687;

    /// Ring of local offsets in meters around the Kuala Lumpur test origin.
    fn ring_from_meters(offsets: &[(f64, f64)]) -> Vec<LatLon> {
        let meters_per_lon = METERS_PER_DEGREE * LAT0.to_radians().cos();
        offsets
            .iter()
            .map(|&(x, y)| LatLon::new(LAT0 + y / METERS_PER_DEGREE, LON0 + x / meters_per_lon))
            .collect()
    }

    fn regular_polygon(n: usize, radius_m: f64) -> Vec<LatLon> {
        let offsets: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                (radius_m * theta.cos(), radius_m * theta.sin())
            })
            .collect();
        ring_from_meters(&offsets)
    }

    #[test]
    fn square_area_and_perimeter() {
        let ring = ring_from_meters(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let g = compute_ring(&ring).expect("square is valid");
        assert!((g.area_m2 - 100.0).abs() < 0.5, "area {}", g.area_m2);
        assert!((g.perimeter_m - 40.0).abs() < 0.1, "perimeter {}", g.perimeter_m);
        assert!((g.shape_factor - 1.128).abs() < 0.01);
        assert!(g.has_precise_geometry);
        assert!(!g.area_clamped);
    }

    #[test]
    fn orientation_does_not_change_metrics() {
        // L-shaped (non-convex) footprint, 300 m².
        let ring = ring_from_meters(&[
            (0.0, 0.0),
            (20.0, 0.0),
            (20.0, 10.0),
            (10.0, 10.0),
            (10.0, 20.0),
            (0.0, 20.0),
        ]);
        let mut reversed = ring.clone();
        reversed.reverse();
        let ccw = compute_ring(&ring).expect("valid");
        let cw = compute_ring(&reversed).expect("valid");
        assert!((ccw.area_m2 - 300.0).abs() < 1.5, "area {}", ccw.area_m2);
        assert!((ccw.area_m2 - cw.area_m2).abs() < 1e-6);
        assert!((ccw.perimeter_m - cw.perimeter_m).abs() < 1e-6);
        assert!((ccw.shape_factor - cw.shape_factor).abs() < 1e-9);

        let planar = [
            (0.0, 0.0),
            (20.0, 0.0),
            (20.0, 10.0),
            (10.0, 10.0),
            (10.0, 20.0),
            (0.0, 20.0),
        ];
        let mut flipped = planar;
        flipped.reverse();
        assert_eq!(shoelace_area(&planar), 300.0);
        assert_eq!(shoelace_area(&flipped), 300.0);
        assert_eq!(ring_perimeter(&planar), ring_perimeter(&flipped));
    }

    #[test]
    fn closing_vertex_is_ignored() {
        let mut ring = ring_from_meters(&[(0.0, 0.0), (20.0, 0.0), (20.0, 5.0), (0.0, 5.0)]);
        let open = compute_ring(&ring).expect("valid");
        ring.push(ring[0]);
        let closed = compute_ring(&ring).expect("valid");
        assert!((open.area_m2 - closed.area_m2).abs() < 1e-9);
        assert!((open.perimeter_m - closed.perimeter_m).abs() < 1e-9);
    }

    #[test]
    fn shape_factor_approaches_one_for_circles() {
        let coarse = compute_ring(&regular_polygon(6, 20.0)).expect("valid");
        let fine = compute_ring(&regular_polygon(256, 20.0)).expect("valid");
        assert!(fine.shape_factor >= 1.0);
        assert!(fine.shape_factor < coarse.shape_factor);
        assert!((fine.shape_factor - 1.0).abs() < 1e-3);
        assert!(fine.compactness > 0.99);
    }

    #[test]
    fn elongated_footprint_has_high_shape_factor() {
        let ring = ring_from_meters(&[(0.0, 0.0), (200.0, 0.0), (200.0, 5.0), (0.0, 5.0)]);
        let g = compute_ring(&ring).expect("valid");
        assert!(g.shape_factor > 2.0, "shape {}", g.shape_factor);
    }

    #[test]
    fn collinear_ring_is_degenerate() {
        let ring = ring_from_meters(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        assert!(compute_ring(&ring).is_err());
    }

    #[test]
    fn two_point_ring_is_degenerate() {
        let ring = ring_from_meters(&[(0.0, 0.0), (10.0, 0.0), (0.0, 0.0)]);
        let err = compute_ring(&ring).expect_err("too few vertices");
        assert!(err.contains("distinct vertices"));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let ring = vec![
            LatLon::new(LAT0, LON0),
            LatLon::new(f64::NAN, LON0),
            LatLon::new(LAT0, LON0 + 0.001),
        ];
        assert!(compute_ring(&ring).is_err());
    }

    #[test]
    fn tiny_footprint_is_clamped_for_sizing() {
        let ring = ring_from_meters(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let g = compute_ring(&ring).expect("valid");
        assert!(g.area_clamped);
        assert_eq!(g.consumption_area_m2, MIN_AREA_M2);
    }

    #[test]
    fn declared_area_is_circular() {
        let g = from_declared_area(250.0).expect("valid");
        assert!((g.shape_factor - 1.0).abs() < 1e-9);
        assert!(!g.has_precise_geometry);
        assert!(from_declared_area(0.0).is_err());
        assert!(from_declared_area(f64::NAN).is_err());
    }
}
