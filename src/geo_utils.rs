//! Geodesic helpers shared by the filter, the simplifiers and the summary.
//!
//! Side lengths are always great-circle distances; triangle areas and
//! point-to-chord distances are derived from them with Heron's formula.

use crate::GeoPoint;
use geo::{Distance, HaversineMeasure, Point};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Chords shorter than this (meters) are treated as a single point.
pub const DEGENERATE_CHORD_M: f64 = 1e-10;

/// Haversine distance between two points in meters.
pub fn haversine_distance(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    HaversineMeasure::new(EARTH_RADIUS_M).distance(to_geo_point(p1), to_geo_point(p2))
}

/// `geo` points are (x, y) = (longitude, latitude).
fn to_geo_point(p: &GeoPoint) -> Point<f64> {
    Point::new(p.longitude, p.latitude)
}

/// Area of a triangle from its three side lengths (Heron's formula).
///
/// The radicand is clamped at zero: nearly collinear triples can round
/// slightly negative.
pub fn heron_area(a: f64, b: f64, c: f64) -> f64 {
    let s = (a + b + c) / 2.0;
    (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt()
}

/// Area in square meters of the triangle spanned by three fixes.
pub fn triangle_area(a: &GeoPoint, b: &GeoPoint, c: &GeoPoint) -> f64 {
    heron_area(
        haversine_distance(a, b),
        haversine_distance(b, c),
        haversine_distance(c, a),
    )
}

/// Distance in meters from `point` to the chord `line_start`-`line_end`.
///
/// Computed as the triangle height over the chord. When the chord collapses
/// to a point the nearer endpoint distance is returned instead.
pub fn perpendicular_distance(point: &GeoPoint, line_start: &GeoPoint, line_end: &GeoPoint) -> f64 {
    let a = haversine_distance(point, line_start);
    let b = haversine_distance(point, line_end);
    let c = haversine_distance(line_start, line_end);

    if c < DEGENERATE_CHORD_M {
        return a.min(b);
    }

    2.0 * heron_area(a, b, c) / c
}

/// Angle at `vertex` (degrees, 0-180) between the rays to `prev` and `next`.
///
/// Uses raw lat/lng deltas as a flat-earth approximation. Returns `None` if
/// either ray has zero length.
pub fn turn_angle_degrees(prev: &GeoPoint, vertex: &GeoPoint, next: &GeoPoint) -> Option<f64> {
    let ba_x = prev.longitude - vertex.longitude;
    let ba_y = prev.latitude - vertex.latitude;
    let bc_x = next.longitude - vertex.longitude;
    let bc_y = next.latitude - vertex.latitude;

    let ba_len = (ba_x * ba_x + ba_y * ba_y).sqrt();
    let bc_len = (bc_x * bc_x + bc_y * bc_y).sqrt();
    if ba_len == 0.0 || bc_len == 0.0 {
        return None;
    }

    let cos_angle = ((ba_x * bc_x + ba_y * bc_y) / (ba_len * bc_len)).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

/// Sum of consecutive great-circle distances in meters.
pub fn trajectory_distance(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}
