//! Reumann-Witkam forward scan.

use crate::GeoPoint;

/// Simplify with a single forward pass.
///
/// Starting at the first point as anchor, skip points that stay within
/// `tolerance` meters of the anchor; the first point beyond it is emitted and
/// becomes the new anchor. The last input point is always appended.
pub fn reumann_witkam(points: &[GeoPoint], tolerance: f64) -> Vec<GeoPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut result = vec![points[0]];
    let mut anchor = 0;
    let mut tail = 0;

    while anchor < last {
        let next = (anchor + 1..points.len())
            .find(|&j| points[anchor].distance_to(&points[j]) > tolerance);

        match next {
            Some(j) => {
                result.push(points[j]);
                anchor = j;
                tail = j;
            }
            None => break,
        }
    }

    if tail != last {
        result.push(points[last]);
    }

    result
}
