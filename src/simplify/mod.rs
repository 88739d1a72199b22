//! # Trajectory Simplification
//!
//! Reduces a trajectory to fewer points while keeping its shape within a
//! distance tolerance (meters). Four interchangeable algorithms:
//!
//! - **Douglas-Peucker**: divide and conquer on the farthest point from the
//!   chord. O(n log n) typical, O(n²) worst case.
//! - **Visvalingam-Whyatt**: repeatedly drops the interior point with the
//!   smallest effective triangle area. O(n²) with per-round recomputation.
//! - **Reumann-Witkam**: forward scan from an anchor, emitting the first point
//!   that leaves the tolerance radius. O(n).
//! - **Perpendicular distance**: keeps points that stand off the line between
//!   the last kept point and their successor, with windowed and
//!   curvature-adaptive variants.
//!
//! All algorithms preserve the relative order of retained points.

mod douglas_peucker;
mod perpendicular;
mod reumann_witkam;
mod visvalingam;

pub use douglas_peucker::douglas_peucker;
pub use perpendicular::{
    adaptive_perpendicular_distance, local_curvatures, perpendicular_distance,
    perpendicular_distance_windowed,
};
pub use reumann_witkam::reumann_witkam;
pub use visvalingam::visvalingam_whyatt;

use crate::geo_utils::trajectory_distance;
use crate::GeoPoint;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Simplification algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    DouglasPeucker,
    Visvalingam,
    ReumannWitkam,
    PerpendicularDistance,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::DouglasPeucker,
        Algorithm::Visvalingam,
        Algorithm::ReumannWitkam,
        Algorithm::PerpendicularDistance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::DouglasPeucker => "DOUGLAS_PEUCKER",
            Algorithm::Visvalingam => "VISVALINGAM",
            Algorithm::ReumannWitkam => "REUMANN_WITKAM",
            Algorithm::PerpendicularDistance => "PERPENDICULAR_DISTANCE",
        }
    }

    /// Resolve an algorithm name, falling back to Douglas-Peucker for
    /// anything unrecognized.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(
                "Unsupported simplification algorithm '{}', using {}",
                name,
                Algorithm::DouglasPeucker
            );
            Algorithm::DouglasPeucker
        })
    }

    pub fn description(&self) -> &'static str {
        match self {
            Algorithm::DouglasPeucker => {
                "Douglas-Peucker: recursive splitting on the farthest point, keeps shape features of winding tracks"
            }
            Algorithm::Visvalingam => {
                "Visvalingam-Whyatt: drops points by smallest effective triangle area"
            }
            Algorithm::ReumannWitkam => {
                "Reumann-Witkam: single forward pass from an anchor, simple and fast"
            }
            Algorithm::PerpendicularDistance => {
                "Perpendicular distance: drops points close to the line through their neighbours, suits smooth tracks"
            }
        }
    }

    pub fn complexity(&self) -> &'static str {
        match self {
            Algorithm::DouglasPeucker => "time O(n log n) typical, O(n^2) worst; space O(n)",
            Algorithm::Visvalingam => "time O(n^2); space O(n)",
            Algorithm::ReumannWitkam => "time O(n); space O(1)",
            Algorithm::PerpendicularDistance => "time O(n); space O(1)",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = crate::TrackError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DOUGLAS_PEUCKER" => Ok(Algorithm::DouglasPeucker),
            "VISVALINGAM" => Ok(Algorithm::Visvalingam),
            "REUMANN_WITKAM" => Ok(Algorithm::ReumannWitkam),
            "PERPENDICULAR_DISTANCE" => Ok(Algorithm::PerpendicularDistance),
            _ => Err(crate::TrackError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Variant used when the algorithm is `PERPENDICULAR_DISTANCE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum PerpendicularMode {
    /// Compare against the last kept point and the immediate successor
    #[default]
    Base,
    /// Compare against every point pair within `window_size` indices
    Windowed { window_size: usize },
    /// Tighten the tolerance where the track bends
    Adaptive,
}

/// Configuration for the simplification stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    /// Default: true
    pub enabled: bool,

    /// Distance tolerance in meters. Larger values drop more points.
    /// Default: 5.0
    pub tolerance: f64,

    /// Algorithm name (case-insensitive). Unknown names fall back to
    /// Douglas-Peucker at run time.
    /// Default: "DOUGLAS_PEUCKER"
    pub algorithm: String,

    /// Always keep the first and last point.
    /// Default: true
    pub keep_endpoints: bool,

    /// Trajectories shorter than this are returned untouched.
    /// Default: 3
    pub min_point_count: usize,

    /// Default: base
    pub perpendicular_mode: PerpendicularMode,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance: 5.0,
            algorithm: Algorithm::DouglasPeucker.as_str().to_string(),
            keep_endpoints: true,
            min_point_count: 3,
            perpendicular_mode: PerpendicularMode::Base,
        }
    }
}

/// Simplify a trajectory according to `config`.
///
/// Inputs shorter than `min_point_count` are returned unchanged, and so are
/// inputs with fewer than three points regardless of algorithm.
pub fn simplify(points: &[GeoPoint], config: &SimplifyConfig) -> Vec<GeoPoint> {
    if points.len() < config.min_point_count {
        debug!(
            "Skipping simplification: {} points, minimum {}",
            points.len(),
            config.min_point_count
        );
        return points.to_vec();
    }

    let algorithm = Algorithm::from_name_or_default(&config.algorithm);
    debug!(
        "Simplifying {} points: tolerance={}m, algorithm={}, keep_endpoints={}",
        points.len(),
        config.tolerance,
        algorithm,
        config.keep_endpoints
    );

    let tolerance = config.tolerance;
    let keep_endpoints = config.keep_endpoints;
    let simplified = match algorithm {
        Algorithm::DouglasPeucker => douglas_peucker(points, tolerance, keep_endpoints),
        Algorithm::Visvalingam => visvalingam_whyatt(points, tolerance),
        Algorithm::ReumannWitkam => reumann_witkam(points, tolerance),
        Algorithm::PerpendicularDistance => match config.perpendicular_mode {
            PerpendicularMode::Base => perpendicular_distance(points, tolerance, keep_endpoints),
            PerpendicularMode::Windowed { window_size } => {
                perpendicular_distance_windowed(points, tolerance, keep_endpoints, window_size)
            }
            PerpendicularMode::Adaptive => {
                adaptive_perpendicular_distance(points, tolerance, keep_endpoints)
            }
        },
    };

    let removed = points.len() - simplified.len();
    debug!(
        "Simplification done: {} -> {} points ({:.2}% removed)",
        points.len(),
        simplified.len(),
        100.0 * removed as f64 / points.len() as f64
    );

    simplified
}

/// Simplify with explicit parameters and an algorithm given by name.
///
/// Uses the base perpendicular-distance variant. Unknown names fall back to
/// Douglas-Peucker.
pub fn simplify_points(
    points: &[GeoPoint],
    tolerance: f64,
    algorithm: &str,
    keep_endpoints: bool,
    min_point_count: usize,
) -> Vec<GeoPoint> {
    let config = SimplifyConfig {
        enabled: true,
        tolerance,
        algorithm: algorithm.to_string(),
        keep_endpoints,
        min_point_count,
        perpendicular_mode: PerpendicularMode::Base,
    };
    simplify(points, &config)
}

/// Size and shape retention of a simplified trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionStats {
    pub original_count: usize,
    pub compressed_count: usize,
    pub removed_count: usize,
    /// Percentage of removed points (0-100)
    pub compression_rate: f64,
    /// Simplified length as a percentage of the original length
    pub distance_preservation_rate: f64,
}

impl CompressionStats {
    pub fn compute(original: &[GeoPoint], compressed: &[GeoPoint]) -> Self {
        let removed_count = original.len().saturating_sub(compressed.len());
        let compression_rate = if original.is_empty() {
            0.0
        } else {
            100.0 * removed_count as f64 / original.len() as f64
        };

        let original_distance = trajectory_distance(original);
        let distance_preservation_rate = if original_distance > 0.0 {
            100.0 * trajectory_distance(compressed) / original_distance
        } else {
            100.0
        };

        Self {
            original_count: original.len(),
            compressed_count: compressed.len(),
            removed_count,
            compression_rate,
            distance_preservation_rate,
        }
    }
}

impl std::fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Compression stats: original={}, compressed={}, removed={}, rate={:.2}%, distance preserved={:.2}%",
            self.original_count,
            self.compressed_count,
            self.removed_count,
            self.compression_rate,
            self.distance_preservation_rate
        )
    }
}

/// Map retained indices back to points.
fn collect_indices(points: &[GeoPoint], indices: &[usize]) -> Vec<GeoPoint> {
    indices.iter().map(|&i| points[i]).collect()
}
