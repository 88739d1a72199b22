//! Coordinate datum conversion between WGS84, GCJ02 and BD09.
//!
//! Direct formulas exist for WGS84 <-> GCJ02 and GCJ02 <-> BD09.
//! WGS84 <-> BD09 is composed through GCJ02, so it carries the rounding of
//! both steps. The offset polynomials and constants are the published
//! empirical approximation and must not be altered.

use crate::GeoPoint;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Semi-major axis of the Krasovsky 1940 ellipsoid used by GCJ02.
const KRASOVSKY_A: f64 = 6_378_245.0;
/// First eccentricity squared of the same ellipsoid.
const KRASOVSKY_EE: f64 = 0.006_693_421_622_965_943_23;

/// Supported coordinate reference systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Datum {
    /// GPS-native datum
    Wgs84,
    /// Chinese national offset datum ("Mars coordinates")
    Gcj02,
    /// Baidu's offset on top of GCJ02
    Bd09,
}

impl Datum {
    pub const ALL: [Datum; 3] = [Datum::Wgs84, Datum::Gcj02, Datum::Bd09];

    pub fn as_str(&self) -> &'static str {
        match self {
            Datum::Wgs84 => "WGS84",
            Datum::Gcj02 => "GCJ02",
            Datum::Bd09 => "BD09",
        }
    }

    /// Check whether `name` is one of the supported datum tokens.
    pub fn is_supported(name: &str) -> bool {
        name.parse::<Datum>().is_ok()
    }
}

impl std::fmt::Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Datum {
    type Err = crate::TrackError;

    /// Tokens must match exactly: `WGS84`, `GCJ02` or `BD09`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "WGS84" => Ok(Datum::Wgs84),
            "GCJ02" => Ok(Datum::Gcj02),
            "BD09" => Ok(Datum::Bd09),
            _ => Err(crate::TrackError::UnsupportedDatum(s.to_string())),
        }
    }
}

/// Configuration for the datum transform stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Default: false
    pub enabled: bool,
    /// Source datum token. Default: "WGS84"
    pub source: String,
    /// Target datum token. Default: "GCJ02"
    pub target: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            source: Datum::Wgs84.as_str().to_string(),
            target: Datum::Gcj02.as_str().to_string(),
        }
    }
}

/// Convert a single coordinate pair. Returns `(lat, lng)`.
pub fn transform_point(lat: f64, lng: f64, source: Datum, target: Datum) -> (f64, f64) {
    match (source, target) {
        (s, t) if s == t => (lat, lng),
        (Datum::Wgs84, Datum::Gcj02) => wgs84_to_gcj02(lat, lng),
        (Datum::Gcj02, Datum::Wgs84) => gcj02_to_wgs84(lat, lng),
        (Datum::Gcj02, Datum::Bd09) => gcj02_to_bd09(lat, lng),
        (Datum::Bd09, Datum::Gcj02) => bd09_to_gcj02(lat, lng),
        (Datum::Wgs84, Datum::Bd09) => {
            let (gcj_lat, gcj_lng) = wgs84_to_gcj02(lat, lng);
            gcj02_to_bd09(gcj_lat, gcj_lng)
        }
        (Datum::Bd09, Datum::Wgs84) => {
            let (gcj_lat, gcj_lng) = bd09_to_gcj02(lat, lng);
            gcj02_to_wgs84(gcj_lat, gcj_lng)
        }
        _ => (lat, lng),
    }
}

/// Convert every point of a trajectory. Only latitude/longitude change.
pub fn transform(points: &[GeoPoint], source: Datum, target: Datum) -> Vec<GeoPoint> {
    if points.is_empty() {
        return Vec::new();
    }

    debug!(
        "Datum transform {} -> {}: {} points",
        source,
        target,
        points.len()
    );

    points
        .iter()
        .map(|p| {
            let (lat, lng) = transform_point(p.latitude, p.longitude, source, target);
            p.with_coordinates(lat, lng)
        })
        .collect()
}

/// Convert a trajectory between datums given by name.
///
/// An unknown token on either side is not an error: the condition is logged
/// and the coordinates come back unchanged.
pub fn transform_named(points: &[GeoPoint], source: &str, target: &str) -> Vec<GeoPoint> {
    match (source.parse::<Datum>(), target.parse::<Datum>()) {
        (Ok(s), Ok(t)) => transform(points, s, t),
        _ => {
            warn!(
                "Unsupported datum conversion {} -> {}, returning original coordinates",
                source, target
            );
            points.to_vec()
        }
    }
}

fn wgs84_to_gcj02(lat: f64, lng: f64) -> (f64, f64) {
    let mut d_lat = offset_lat(lng - 105.0, lat - 35.0);
    let mut d_lng = offset_lng(lng - 105.0, lat - 35.0);
    let rad_lat = lat / 180.0 * PI;
    let magic = 1.0 - KRASOVSKY_EE * rad_lat.sin() * rad_lat.sin();
    let sqrt_magic = magic.sqrt();
    d_lat = (d_lat * 180.0) / ((KRASOVSKY_A * (1.0 - KRASOVSKY_EE)) / (magic * sqrt_magic) * PI);
    d_lng = (d_lng * 180.0) / (KRASOVSKY_A / sqrt_magic * rad_lat.cos() * PI);

    (lat + d_lat, lng + d_lng)
}

// Single-step inverse: subtract the offset evaluated at the GCJ02 position.
fn gcj02_to_wgs84(lat: f64, lng: f64) -> (f64, f64) {
    let (shifted_lat, shifted_lng) = wgs84_to_gcj02(lat, lng);
    (lat - (shifted_lat - lat), lng - (shifted_lng - lng))
}

fn gcj02_to_bd09(lat: f64, lng: f64) -> (f64, f64) {
    let x = lng;
    let y = lat;
    let z = (x * x + y * y).sqrt() + 0.00002 * (y * PI).sin();
    let theta = y.atan2(x) + 0.000003 * (x * PI).cos();

    (z * theta.sin() + 0.006, z * theta.cos() + 0.0065)
}

fn bd09_to_gcj02(lat: f64, lng: f64) -> (f64, f64) {
    let x = lng - 0.0065;
    let y = lat - 0.006;
    let z = (x * x + y * y).sqrt() - 0.00002 * (y * PI).sin();
    let theta = y.atan2(x) - 0.000003 * (x * PI).cos();

    (z * theta.sin(), z * theta.cos())
}

fn offset_lat(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn offset_lng(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}
