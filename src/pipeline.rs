//! # Trajectory Pipeline
//!
//! Chains the stages in a fixed order:
//!
//! 1. Datum transform (if enabled)
//! 2. Noise filter (if enabled)
//! 3. Simplification (if enabled)
//!
//! Each stage consumes the complete output of the previous one. A disabled
//! stage is an identity pass. With statistics enabled, every run produces a
//! [`ProcessingSummary`].

use crate::config::PipelineConfig;
use crate::datum::{self, Datum};
use crate::error::Result;
use crate::filter::filter_noise_with_stats;
use crate::simplify::{simplify, Algorithm};
use crate::summary::ProcessingSummary;
use crate::GeoPoint;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Output of [`TrajectoryPipeline::process_with_result`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub points: Vec<GeoPoint>,
    /// `None` when statistics are disabled or the input was empty
    pub summary: Option<ProcessingSummary>,
}

impl ProcessingResult {
    /// Percentage of points removed, or 0 without a summary.
    pub fn compression_rate(&self) -> f64 {
        self.summary.as_ref().map_or(0.0, |s| s.compression_rate)
    }

    pub fn processing_time_ms(&self) -> u64 {
        self.summary.as_ref().map_or(0, |s| s.processing_time_ms)
    }
}

impl fmt::Display for ProcessingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.summary {
            Some(summary) => write!(f, "{}", summary),
            None => write!(f, "Processed {} points", self.points.len()),
        }
    }
}

/// Per-stage bookkeeping for one run.
#[derive(Debug, Default)]
struct StageCounts {
    transformed: usize,
    filtered: Option<usize>,
}

/// Configured trajectory processor.
///
/// Holds only its validated configuration, so one pipeline can serve any
/// number of independent runs, from any number of threads.
#[derive(Debug, Clone)]
pub struct TrajectoryPipeline {
    config: PipelineConfig,
}

impl TrajectoryPipeline {
    /// Build a pipeline. Fails if an enabled stage is misconfigured.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        if let Err(e) = config.validate() {
            error!("[Pipeline] Invalid configuration: {}", e);
            return Err(e);
        }
        debug!("[Pipeline] Created\n{}", config.summary());
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every enabled stage and return the processed points.
    pub fn process(&self, points: &[GeoPoint]) -> Vec<GeoPoint> {
        self.process_with_result(points).points
    }

    /// Run every enabled stage and return the points with their summary.
    pub fn process_with_result(&self, points: &[GeoPoint]) -> ProcessingResult {
        if !self.config.enabled {
            debug!("[Pipeline] Disabled, returning input unchanged");
            return ProcessingResult {
                points: points.to_vec(),
                summary: None,
            };
        }
        if points.is_empty() {
            warn!("[Pipeline] Empty trajectory, nothing to process");
            return ProcessingResult {
                points: Vec::new(),
                summary: None,
            };
        }

        let start = Instant::now();
        info!("[Pipeline] Processing {} points", points.len());

        let (processed, counts) = self.run_stages(points);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let summary = if self.config.statistics.enabled {
            ProcessingSummary::from_points(points, &processed, elapsed_ms).map(|mut s| {
                s.coordinate_transform_count = counts.transformed;
                if let Some(filtered) = counts.filtered {
                    s.filtered_point_count = filtered;
                }
                s
            })
        } else {
            None
        };

        match &summary {
            Some(s) if self.config.statistics.formatted_output => info!("{}", s),
            Some(s) => info!(
                "[Pipeline] {} -> {} points ({:.2}% removed), {:.2} m in {} ms",
                s.original_point_count,
                s.processed_point_count,
                s.compression_rate,
                s.total_distance,
                s.processing_time_ms
            ),
            None => info!(
                "[Pipeline] {} -> {} points in {} ms",
                points.len(),
                processed.len(),
                elapsed_ms
            ),
        }

        ProcessingResult {
            points: processed,
            summary,
        }
    }

    fn run_stages(&self, points: &[GeoPoint]) -> (Vec<GeoPoint>, StageCounts) {
        let mut counts = StageCounts::default();

        let mut current = if self.config.transform.enabled {
            counts.transformed = points.len();
            self.apply_transform(points)
        } else {
            points.to_vec()
        };

        if self.config.filter.enabled {
            let (kept, stats) = filter_noise_with_stats(&current, &self.config.filter);
            debug!("[Pipeline] {}", stats);
            counts.filtered = Some(stats.removed_count);
            current = kept;
        }

        if self.config.simplify.enabled {
            current = simplify(&current, &self.config.simplify);
        }

        (current, counts)
    }

    fn apply_transform(&self, points: &[GeoPoint]) -> Vec<GeoPoint> {
        datum::transform_named(
            points,
            &self.config.transform.source,
            &self.config.transform.target,
        )
    }

    /// Run only the datum transform stage.
    pub fn transform_only(&self, points: &[GeoPoint]) -> Vec<GeoPoint> {
        if !self.config.transform.enabled {
            warn!("[Pipeline] Transform stage is disabled, returning input unchanged");
            return points.to_vec();
        }
        self.apply_transform(points)
    }

    /// Run only the noise filter stage.
    pub fn filter_only(&self, points: &[GeoPoint]) -> Vec<GeoPoint> {
        if !self.config.filter.enabled {
            warn!("[Pipeline] Filter stage is disabled, returning input unchanged");
            return points.to_vec();
        }
        filter_noise_with_stats(points, &self.config.filter).0
    }

    /// Run only the simplification stage.
    pub fn simplify_only(&self, points: &[GeoPoint]) -> Vec<GeoPoint> {
        if !self.config.simplify.enabled {
            warn!("[Pipeline] Simplify stage is disabled, returning input unchanged");
            return points.to_vec();
        }
        simplify(points, &self.config.simplify)
    }

    /// Configuration summary plus the supported datums and algorithms.
    pub fn pipeline_info(&self) -> String {
        let datums: Vec<&str> = Datum::ALL.iter().map(Datum::as_str).collect();
        let mut info = self.config.summary();
        info.push_str("\nSupported datums: ");
        info.push_str(&datums.join(", "));
        info.push_str("\nSupported algorithms:");
        for algorithm in Algorithm::ALL {
            info.push_str(&format!(
                "\n  {} - {} [{}]",
                algorithm,
                algorithm.description(),
                algorithm.complexity()
            ));
        }
        info
    }

    /// Process independent trajectories one after another.
    pub fn process_batch(&self, trajectories: &[Vec<GeoPoint>]) -> Vec<ProcessingResult> {
        info!("[Pipeline] Batch of {} trajectories", trajectories.len());
        trajectories
            .iter()
            .map(|t| self.process_with_result(t))
            .collect()
    }

    /// Process independent trajectories in parallel. Results keep input order.
    #[cfg(feature = "parallel")]
    pub fn process_batch_parallel(&self, trajectories: &[Vec<GeoPoint>]) -> Vec<ProcessingResult> {
        use rayon::prelude::*;

        info!(
            "[Pipeline] Parallel batch of {} trajectories",
            trajectories.len()
        );
        trajectories
            .par_iter()
            .map(|t| self.process_with_result(t))
            .collect()
    }
}
