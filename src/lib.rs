//! # trackclean
//!
//! GPS trajectory cleaning and compaction library.
//!
//! This library provides:
//! - Geodesic distance and kinematic primitives on GPS fixes
//! - Datum conversion between WGS84, GCJ02 and BD09
//! - Multi-criterion noise filtering (accuracy, time gap, jumps, speed, altitude)
//! - Four polyline simplification algorithms (Douglas-Peucker, Visvalingam-Whyatt,
//!   Reumann-Witkam, Perpendicular-Distance with windowed/adaptive variants)
//! - A configurable pipeline that chains the stages and summarizes the result
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel batch processing with rayon
//! - **`cli`** - Build the `trackclean-cli` binary (GPX/JSON in, GPX/JSON out)
//!
//! ## Quick Start
//!
//! ```rust
//! use trackclean::{GeoPoint, PipelineConfig, TrajectoryPipeline};
//!
//! let points: Vec<GeoPoint> = (0..50)
//!     .map(|i| GeoPoint::new(39.9 + i as f64 * 0.0001, 116.4, i * 1000))
//!     .collect();
//!
//! let pipeline = TrajectoryPipeline::new(PipelineConfig::default()).unwrap();
//! let result = pipeline.process_with_result(&points);
//!
//! assert!(result.points.len() < points.len());
//! if let Some(summary) = &result.summary {
//!     println!("{}", summary);
//! }
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrackError};

// Geodesic primitives (haversine, Heron distances, bounds)
pub mod geo_utils;

// Datum conversion (WGS84 / GCJ02 / BD09)
pub mod datum;
pub use datum::{transform, transform_named, transform_point, Datum, TransformConfig};

// Noise filtering
pub mod filter;
pub use filter::{filter_noise, filter_noise_with_stats, FilterConfig, FilterStats, Rejection};

// Polyline simplification engine
pub mod simplify;
pub use simplify::{
    simplify, simplify_points, Algorithm, CompressionStats, PerpendicularMode, SimplifyConfig,
};

// Processing summary and report
pub mod summary;
pub use summary::ProcessingSummary;

// Pipeline configuration
pub mod config;
pub use config::{PipelineConfig, StatisticsConfig};

// Pipeline orchestrator
pub mod pipeline;
pub use pipeline::{ProcessingResult, TrajectoryPipeline};

// ============================================================================
// Core Types
// ============================================================================

/// A GPS fix with position, time and optional sensor readings.
///
/// Points are values: every stage that changes a point builds a new one.
///
/// # Example
/// ```
/// use trackclean::GeoPoint;
/// let point = GeoPoint::new(39.9042, 116.4074, 1_700_000_000_000).with_accuracy(8.0);
/// assert_eq!(point.accuracy, Some(8.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: i64,
    /// Altitude in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Reported speed in km/h
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Heading in degrees (0-360)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
    /// Horizontal accuracy in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl GeoPoint {
    /// Create a new point with no optional readings.
    pub fn new(latitude: f64, longitude: f64, timestamp: i64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
            altitude: None,
            speed: None,
            bearing: None,
            accuracy: None,
        }
    }

    pub fn with_altitude(self, altitude: f64) -> Self {
        Self {
            altitude: Some(altitude),
            ..self
        }
    }

    pub fn with_speed(self, speed: f64) -> Self {
        Self {
            speed: Some(speed),
            ..self
        }
    }

    pub fn with_bearing(self, bearing: f64) -> Self {
        Self {
            bearing: Some(bearing),
            ..self
        }
    }

    pub fn with_accuracy(self, accuracy: f64) -> Self {
        Self {
            accuracy: Some(accuracy),
            ..self
        }
    }

    /// Copy of this point at new coordinates; every other field is kept.
    pub fn with_coordinates(self, latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..self
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        geo_utils::haversine_distance(self, other)
    }

    /// Absolute time difference to `other` in milliseconds.
    pub fn time_diff_to(&self, other: &GeoPoint) -> u64 {
        self.timestamp.abs_diff(other.timestamp)
    }

    /// Average speed between the two fixes in km/h.
    ///
    /// Returns 0.0 when both fixes share a timestamp. Callers aggregating
    /// speeds must treat that as "undefined", not as standing still.
    pub fn average_speed_to(&self, other: &GeoPoint) -> f64 {
        let time_diff = self.time_diff_to(other);
        if time_diff == 0 {
            return 0.0;
        }
        self.distance_to(other) / (time_diff as f64 / 1000.0) * 3.6
    }
}

/// An ordered sequence of fixes; index order is path order.
pub type Trajectory = Vec<GeoPoint>;

/// Bounding box of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// `[min_lat, min_lng, max_lat, max_lng]`
    pub fn as_array(&self) -> [f64; 4] {
        [self.min_lat, self.min_lng, self.max_lat, self.max_lng]
    }
}
