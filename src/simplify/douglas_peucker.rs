//! Douglas-Peucker simplification over geodesic distances.
//!
//! Ranges are processed from an explicit work stack instead of recursion so
//! long, nearly straight tracks cannot exhaust the call stack.

use super::collect_indices;
use crate::geo_utils::perpendicular_distance;
use crate::GeoPoint;

/// Simplify with Douglas-Peucker.
///
/// For each range `[first, last]` the interior point farthest from the chord
/// is found; if it lies beyond `tolerance` it is kept and both halves are
/// processed, otherwise the range collapses to its endpoints. The first
/// strictly greater distance wins ties.
pub fn douglas_peucker(points: &[GeoPoint], tolerance: f64, keep_endpoints: bool) -> Vec<GeoPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut retained = douglas_peucker_indices(points, tolerance);

    if keep_endpoints {
        let last = points.len() - 1;
        if retained.first() != Some(&0) {
            retained.insert(0, 0);
        }
        if retained.last() != Some(&last) {
            retained.push(last);
        }
    }

    collect_indices(points, &retained)
}

/// Indices kept by Douglas-Peucker, in ascending order.
fn douglas_peucker_indices(points: &[GeoPoint], tolerance: f64) -> Vec<usize> {
    let n = points.len();
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last - first < 2 {
            continue;
        }

        let (index, max_dist) = farthest_from_chord(points, first, last);
        if max_dist > tolerance {
            keep[index] = true;
            stack.push((index, last));
            stack.push((first, index));
        }
    }

    keep.iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect()
}

/// Interior point of `[first, last]` with the largest distance to the chord.
/// Returns `(first, 0.0)` when no interior point is off the chord.
fn farthest_from_chord(points: &[GeoPoint], first: usize, last: usize) -> (usize, f64) {
    let start = &points[first];
    let end = &points[last];

    let mut index = first;
    let mut max_dist = 0.0;
    for (i, point) in points.iter().enumerate().take(last).skip(first + 1) {
        let dist = perpendicular_distance(point, start, end);
        if dist > max_dist {
            max_dist = dist;
            index = i;
        }
    }

    (index, max_dist)
}
