//! Visvalingam-Whyatt effective-area elimination.

use super::collect_indices;
use crate::geo_utils::triangle_area;
use crate::GeoPoint;

/// Simplify by repeatedly removing the interior point whose triangle with
/// its current neighbours has the smallest area (m²).
///
/// Stops once that smallest area exceeds `tolerance` or only the two
/// endpoints remain. The lowest index wins ties.
///
/// Areas are recomputed for every round, which makes this O(n²). A heap
/// with lazy invalidation would bring it to O(n log n) for very long tracks.
pub fn visvalingam_whyatt(points: &[GeoPoint], tolerance: f64) -> Vec<GeoPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut remaining: Vec<usize> = (0..points.len()).collect();

    while remaining.len() > 2 {
        let Some((min_pos, min_area)) = smallest_effective_area(points, &remaining) else {
            break;
        };
        if min_area > tolerance {
            break;
        }
        remaining.remove(min_pos);
    }

    collect_indices(points, &remaining)
}

/// Position in `remaining` of the interior point with the smallest area.
fn smallest_effective_area(points: &[GeoPoint], remaining: &[usize]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for pos in 1..remaining.len() - 1 {
        let area = triangle_area(
            &points[remaining[pos - 1]],
            &points[remaining[pos]],
            &points[remaining[pos + 1]],
        );
        if best.map_or(true, |(_, min)| area < min) {
            best = Some((pos, area));
        }
    }
    best
}
