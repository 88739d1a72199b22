//! Noise filtering for raw GPS fixes.
//!
//! The filter walks the trajectory once, comparing each fix with the last
//! *accepted* fix. The first fix is always accepted. Rejected fixes are
//! dropped and never become a reference for later comparisons.
//!
//! Checks run in a fixed order and the first failure rejects:
//! 1. declared accuracy above `max_accuracy`
//! 2. time gap above `max_time_interval`
//! 3. distance jump above `max_distance`
//! 4. speed above `max_speed`, or below `min_speed` while moving less than
//!    [`STATIONARY_RADIUS_M`] (only when the time gap is non-zero)
//! 5. altitude jump above [`MAX_ALTITUDE_JUMP_M`] within
//!    [`ALTITUDE_JUMP_RADIUS_M`] (only when both fixes carry altitude)

use crate::GeoPoint;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Slow hops shorter than this are treated as stationary drift.
pub const STATIONARY_RADIUS_M: f64 = 10.0;

/// Altitude change that is implausible over a short horizontal hop.
pub const MAX_ALTITUDE_JUMP_M: f64 = 1000.0;

/// Horizontal distance below which [`MAX_ALTITUDE_JUMP_M`] applies.
pub const ALTITUDE_JUMP_RADIUS_M: f64 = 100.0;

/// Thresholds for the noise filter stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Default: false
    pub enabled: bool,

    /// Fastest plausible movement in km/h. Faster hops are drift.
    /// Default: 180.0
    pub max_speed: f64,

    /// Slowest movement in km/h still counted as motion for short hops.
    /// Default: 0.5
    pub min_speed: f64,

    /// Largest acceptable declared horizontal accuracy in meters.
    /// Default: 100.0
    pub max_accuracy: f64,

    /// Largest acceptable gap to the last accepted fix in milliseconds.
    /// Default: 300000 (5 minutes)
    pub max_time_interval: u64,

    /// Largest acceptable jump from the last accepted fix in meters.
    /// Default: 10000.0
    pub max_distance: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_speed: 180.0,
            min_speed: 0.5,
            max_accuracy: 100.0,
            max_time_interval: 300_000,
            max_distance: 10_000.0,
        }
    }
}

/// Why a fix was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Accuracy,
    TimeGap,
    DistanceJump,
    TooFast,
    Stationary,
    AltitudeJump,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Accuracy => "accuracy",
            Rejection::TimeGap => "time_gap",
            Rejection::DistanceJump => "distance_jump",
            Rejection::TooFast => "too_fast",
            Rejection::Stationary => "stationary",
            Rejection::AltitudeJump => "altitude_jump",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts produced by [`filter_noise_with_stats`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterStats {
    pub original_count: usize,
    pub kept_count: usize,
    pub removed_count: usize,
    /// Percentage of removed fixes (0-100)
    pub removal_rate: f64,
    pub rejections: HashMap<Rejection, usize>,
}

impl std::fmt::Display for FilterStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Filter stats: original={}, kept={}, removed={}, removal rate={:.2}%",
            self.original_count, self.kept_count, self.removed_count, self.removal_rate
        )
    }
}

/// Check `candidate` against the last accepted fix.
pub fn check_transition(
    candidate: &GeoPoint,
    last_accepted: &GeoPoint,
    config: &FilterConfig,
) -> Result<(), Rejection> {
    if candidate.accuracy.is_some_and(|acc| acc > config.max_accuracy) {
        return Err(Rejection::Accuracy);
    }

    let time_diff = candidate.time_diff_to(last_accepted);
    if time_diff > config.max_time_interval {
        return Err(Rejection::TimeGap);
    }

    let distance = candidate.distance_to(last_accepted);
    if distance > config.max_distance {
        return Err(Rejection::DistanceJump);
    }

    if time_diff > 0 {
        let speed = candidate.average_speed_to(last_accepted);
        if speed > config.max_speed {
            return Err(Rejection::TooFast);
        }
        if speed < config.min_speed && distance < STATIONARY_RADIUS_M {
            return Err(Rejection::Stationary);
        }
    }

    if let (Some(alt), Some(prev_alt)) = (candidate.altitude, last_accepted.altitude) {
        if (alt - prev_alt).abs() > MAX_ALTITUDE_JUMP_M && distance < ALTITUDE_JUMP_RADIUS_M {
            return Err(Rejection::AltitudeJump);
        }
    }

    Ok(())
}

/// Remove noisy fixes from a trajectory.
///
/// Inputs with fewer than two points are returned unchanged.
pub fn filter_noise(points: &[GeoPoint], config: &FilterConfig) -> Vec<GeoPoint> {
    filter_noise_with_stats(points, config).0
}

/// [`filter_noise`] that also reports per-reason rejection counts.
pub fn filter_noise_with_stats(
    points: &[GeoPoint],
    config: &FilterConfig,
) -> (Vec<GeoPoint>, FilterStats) {
    if points.len() < 2 {
        let stats = FilterStats {
            original_count: points.len(),
            kept_count: points.len(),
            ..Default::default()
        };
        return (points.to_vec(), stats);
    }

    debug!(
        "Noise filter: {} points, max_speed={}km/h, min_speed={}km/h, max_accuracy={}m",
        points.len(),
        config.max_speed,
        config.min_speed,
        config.max_accuracy
    );

    let mut rejections: HashMap<Rejection, usize> = HashMap::new();
    let kept = accept_relative_to_last(points, |candidate, last| {
        check_transition(candidate, last, config).map_err(|reason| {
            *rejections.entry(reason).or_insert(0) += 1;
            reason
        })
    });

    let removed = points.len() - kept.len();
    debug!(
        "Noise filter done: {} -> {} points ({} removed)",
        points.len(),
        kept.len(),
        removed
    );

    let stats = FilterStats {
        original_count: points.len(),
        kept_count: kept.len(),
        removed_count: removed,
        removal_rate: 100.0 * removed as f64 / points.len() as f64,
        rejections,
    };
    (kept, stats)
}

/// Keep fixes whose average speed from the last accepted fix is at most
/// `max_speed`. Fixes sharing a timestamp with it are kept.
pub fn filter_by_speed(points: &[GeoPoint], max_speed: f64) -> Vec<GeoPoint> {
    accept_relative_to_last(points, |candidate, last| {
        if candidate.time_diff_to(last) == 0 || candidate.average_speed_to(last) <= max_speed {
            Ok(())
        } else {
            Err(Rejection::TooFast)
        }
    })
}

/// Keep fixes whose declared accuracy is at most `max_accuracy`.
/// Fixes without an accuracy reading are kept.
pub fn filter_by_accuracy(points: &[GeoPoint], max_accuracy: f64) -> Vec<GeoPoint> {
    points
        .iter()
        .filter(|p| p.accuracy.map_or(true, |acc| acc <= max_accuracy))
        .copied()
        .collect()
}

/// Keep fixes within `max_distance` meters of the last accepted fix.
pub fn filter_by_distance(points: &[GeoPoint], max_distance: f64) -> Vec<GeoPoint> {
    accept_relative_to_last(points, |candidate, last| {
        if candidate.distance_to(last) <= max_distance {
            Ok(())
        } else {
            Err(Rejection::DistanceJump)
        }
    })
}

/// Keep fixes within `max_time_interval` ms of the last accepted fix.
pub fn filter_by_time_interval(points: &[GeoPoint], max_time_interval: u64) -> Vec<GeoPoint> {
    accept_relative_to_last(points, |candidate, last| {
        if candidate.time_diff_to(last) <= max_time_interval {
            Ok(())
        } else {
            Err(Rejection::TimeGap)
        }
    })
}

/// Fold over the trajectory carrying the accepted sequence; its tail is the
/// reference for the next candidate.
fn accept_relative_to_last<F>(points: &[GeoPoint], mut check: F) -> Vec<GeoPoint>
where
    F: FnMut(&GeoPoint, &GeoPoint) -> Result<(), Rejection>,
{
    let Some((first, rest)) = points.split_first() else {
        return Vec::new();
    };

    rest.iter()
        .enumerate()
        .fold(vec![*first], |mut accepted, (offset, candidate)| {
            let last = accepted[accepted.len() - 1];
            match check(candidate, &last) {
                Ok(()) => accepted.push(*candidate),
                Err(reason) => debug!(
                    "Dropping point {} ({}, {}) at {}: {}",
                    offset + 1,
                    candidate.latitude,
                    candidate.longitude,
                    candidate.timestamp,
                    reason
                ),
            }
            accepted
        })
}
