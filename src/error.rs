//! Error types for trackclean.
//!
//! Only configuration handling can fail. Processing functions never return
//! errors: degenerate input passes through unchanged.

use thiserror::Error;

/// Errors raised while loading or validating a pipeline configuration.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("unsupported datum '{0}', supported: WGS84, GCJ02, BD09")]
    UnsupportedDatum(String),

    #[error(
        "unsupported simplification algorithm '{0}', supported: DOUGLAS_PEUCKER, VISVALINGAM, REUMANN_WITKAM, PERPENDICULAR_DISTANCE"
    )]
    UnsupportedAlgorithm(String),

    #[error("{name} must be greater than 0 (got {value})")]
    NonPositiveThreshold { name: &'static str, value: f64 },

    #[error("{name} must not be negative (got {value})")]
    NegativeThreshold { name: &'static str, value: f64 },

    #[error("min_point_count must be at least 2 (got {0})")]
    MinPointCount(usize),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
