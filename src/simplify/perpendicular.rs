//! Perpendicular-distance simplification and its windowed and adaptive
//! variants.

use super::collect_indices;
use crate::geo_utils::{perpendicular_distance as distance_to_chord, turn_angle_degrees};
use crate::GeoPoint;
use log::debug;

/// Smallest window accepted by [`perpendicular_distance_windowed`].
const MIN_WINDOW: usize = 2;

/// Keep each interior point whose distance to the line from the last kept
/// point to its successor in the input exceeds `tolerance`.
///
/// The first point is always kept. With `keep_endpoints` the last point is
/// kept too; otherwise it is kept only if it stands off the line through the
/// last two kept points by more than `tolerance`.
pub fn perpendicular_distance(
    points: &[GeoPoint],
    tolerance: f64,
    keep_endpoints: bool,
) -> Vec<GeoPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let n = points.len();
    let mut kept = vec![0usize];

    for i in 1..n - 1 {
        let prev = &points[kept[kept.len() - 1]];
        let distance = distance_to_chord(&points[i], prev, &points[i + 1]);
        if distance > tolerance {
            kept.push(i);
        } else {
            debug!(
                "Perpendicular filter dropped point {}: {:.3}m <= {}m",
                i, distance, tolerance
            );
        }
    }

    if keep_endpoints {
        kept.push(n - 1);
    } else if kept.len() >= 2 {
        let prev = &points[kept[kept.len() - 2]];
        let current = &points[kept[kept.len() - 1]];
        if distance_to_chord(&points[n - 1], prev, current) > tolerance {
            kept.push(n - 1);
        }
    }

    collect_indices(points, &kept)
}

/// Keep an interior point if the line through *any* pair of other points
/// within `window_size` indices of it passes farther than `tolerance` away.
///
/// Windows smaller than 2 are widened to 2. Costs O(n · window_size²).
pub fn perpendicular_distance_windowed(
    points: &[GeoPoint],
    tolerance: f64,
    keep_endpoints: bool,
    window_size: usize,
) -> Vec<GeoPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let window = window_size.max(MIN_WINDOW);
    let n = points.len();
    let mut kept = vec![0usize];

    for i in 1..n - 1 {
        let start = i.saturating_sub(window);
        let end = i.saturating_add(window).min(n - 1);
        let current = &points[i];

        let off_some_line = (start..end).filter(|&j| j != i).any(|j| {
            (j + 1..=end)
                .filter(|&k| k != i)
                .any(|k| distance_to_chord(current, &points[j], &points[k]) > tolerance)
        });

        if off_some_line {
            kept.push(i);
        }
    }

    if keep_endpoints {
        kept.push(n - 1);
    }

    collect_indices(points, &kept)
}

/// Perpendicular-distance simplification with a per-point tolerance.
///
/// The tolerance at point `i` is `base_tolerance * (1 - curvature * 0.5)`,
/// floored at `base_tolerance * 0.1`, so bends keep more points.
pub fn adaptive_perpendicular_distance(
    points: &[GeoPoint],
    base_tolerance: f64,
    keep_endpoints: bool,
) -> Vec<GeoPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let n = points.len();
    let curvatures = local_curvatures(points);
    let mut kept = vec![0usize];

    for i in 1..n - 1 {
        let tolerance = (base_tolerance * (1.0 - curvatures[i] * 0.5)).max(base_tolerance * 0.1);
        let prev = &points[kept[kept.len() - 1]];
        if distance_to_chord(&points[i], prev, &points[i + 1]) > tolerance {
            kept.push(i);
        }
    }

    if keep_endpoints {
        kept.push(n - 1);
    }

    collect_indices(points, &kept)
}

/// Curvature in `[0, 1]` for every point, from the planar turn angle at
/// each interior point: `1 - |angle - 90°| / 90°`.
///
/// Endpoints, and interior points with a zero-length neighbour ray, get 0.
pub fn local_curvatures(points: &[GeoPoint]) -> Vec<f64> {
    let mut curvatures = vec![0.0; points.len()];
    for i in 1..points.len().saturating_sub(1) {
        if let Some(angle) = turn_angle_degrees(&points[i - 1], &points[i], &points[i + 1]) {
            curvatures[i] = (1.0 - (angle - 90.0).abs() / 90.0).clamp(0.0, 1.0);
        }
    }
    curvatures
}
