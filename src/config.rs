//! Pipeline configuration: stage settings, JSON loading and validation.

use crate::datum::{Datum, TransformConfig};
use crate::error::{Result, TrackError};
use crate::filter::FilterConfig;
use crate::simplify::{Algorithm, SimplifyConfig};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

/// Settings for the processing summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Build a [`ProcessingSummary`](crate::ProcessingSummary) for each run.
    /// Default: true
    pub enabled: bool,

    /// Log the multi-line report instead of a one-line summary.
    /// Default: true
    pub formatted_output: bool,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            formatted_output: true,
        }
    }
}

/// Complete pipeline configuration.
///
/// Every section is optional in JSON; missing fields take their defaults.
///
/// ```
/// use trackclean::PipelineConfig;
///
/// let config = PipelineConfig::from_json_str(r#"{"simplify": {"tolerance": 12.5}}"#).unwrap();
/// assert_eq!(config.simplify.tolerance, 12.5);
/// assert_eq!(config.simplify.algorithm, "DOUGLAS_PEUCKER");
/// assert!(!config.filter.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Disabling the pipeline turns every run into a copy of the input.
    /// Default: true
    pub enabled: bool,
    pub transform: TransformConfig,
    pub filter: FilterConfig,
    pub simplify: SimplifyConfig,
    pub statistics: StatisticsConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            transform: TransformConfig::default(),
            filter: FilterConfig::default(),
            simplify: SimplifyConfig::default(),
            statistics: StatisticsConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check the settings of every enabled stage.
    ///
    /// Disabled stages are not inspected, so a disabled filter may carry
    /// thresholds that would otherwise be rejected.
    pub fn validate(&self) -> Result<()> {
        if self.transform.enabled {
            self.transform.source.parse::<Datum>()?;
            self.transform.target.parse::<Datum>()?;
        }

        if self.filter.enabled {
            let filter = &self.filter;
            require_positive("max_speed", filter.max_speed)?;
            require_positive("max_accuracy", filter.max_accuracy)?;
            require_positive("max_distance", filter.max_distance)?;
            require_positive("max_time_interval", filter.max_time_interval as f64)?;
            if !(filter.min_speed.is_finite() && filter.min_speed >= 0.0) {
                return Err(TrackError::NegativeThreshold {
                    name: "min_speed",
                    value: filter.min_speed,
                });
            }
        }

        if self.simplify.enabled {
            require_positive("tolerance", self.simplify.tolerance)?;
            if self.simplify.min_point_count < 2 {
                return Err(TrackError::MinPointCount(self.simplify.min_point_count));
            }
            self.simplify.algorithm.parse::<Algorithm>()?;
        }

        Ok(())
    }

    /// Short multi-line description of the active settings.
    pub fn summary(&self) -> String {
        let mut out = String::from("Pipeline configuration:\n");
        let _ = writeln!(out, "  pipeline: {}", on_off(self.enabled));

        let _ = write!(out, "  transform: {}", on_off(self.transform.enabled));
        if self.transform.enabled {
            let _ = write!(out, " ({} -> {})", self.transform.source, self.transform.target);
        }
        out.push('\n');

        let _ = write!(out, "  filter: {}", on_off(self.filter.enabled));
        if self.filter.enabled {
            let f = &self.filter;
            let _ = write!(
                out,
                " (speed {}-{} km/h, accuracy <= {} m, gap <= {} ms, jump <= {} m)",
                f.min_speed, f.max_speed, f.max_accuracy, f.max_time_interval, f.max_distance
            );
        }
        out.push('\n');

        let _ = write!(out, "  simplify: {}", on_off(self.simplify.enabled));
        if self.simplify.enabled {
            let s = &self.simplify;
            let _ = write!(
                out,
                " ({}, tolerance {} m, keep endpoints {}, min points {})",
                s.algorithm, s.tolerance, s.keep_endpoints, s.min_point_count
            );
        }
        out.push('\n');

        let _ = write!(out, "  statistics: {}", on_off(self.statistics.enabled));
        if self.statistics.enabled && self.statistics.formatted_output {
            out.push_str(" (formatted)");
        }
        out
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<()> {
    // NaN fails this comparison too
    if value > 0.0 {
        Ok(())
    } else {
        Err(TrackError::NonPositiveThreshold { name, value })
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}
