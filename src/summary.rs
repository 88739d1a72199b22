//! Aggregate statistics for one pipeline run.

use crate::geo_utils::haversine_distance;
use crate::{Bounds, GeoPoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Read-only summary of a processed trajectory.
///
/// Counts, start/end points and the bounding box come from the original
/// sequence; distance, time and speed aggregates come from the processed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub original_point_count: usize,
    pub processed_point_count: usize,
    /// Percentage of points removed (0-100)
    pub compression_rate: f64,
    /// Points removed by the noise filter
    pub filtered_point_count: usize,
    /// Points passed through the datum transform
    pub coordinate_transform_count: usize,
    /// Total distance in meters
    pub total_distance: f64,
    /// Sum of consecutive time gaps in milliseconds
    pub total_time: u64,
    /// Mean of consecutive-pair speeds in km/h
    pub average_speed: f64,
    pub max_speed: f64,
    pub min_speed: f64,
    pub start_point: GeoPoint,
    pub end_point: GeoPoint,
    pub bounding_box: Bounds,
    pub processing_time_ms: u64,
}

impl ProcessingSummary {
    /// Build a summary. Returns `None` if `original` is empty.
    ///
    /// `filtered_point_count` defaults to `original - processed`; the
    /// pipeline overrides it with the noise filter's own count.
    pub fn from_points(
        original: &[GeoPoint],
        processed: &[GeoPoint],
        processing_time_ms: u64,
    ) -> Option<Self> {
        let start_point = *original.first()?;
        let end_point = *original.last()?;
        let bounding_box = Bounds::from_points(original)?;

        let removed = original.len().saturating_sub(processed.len());
        let kinematics = Kinematics::from_points(processed);

        Some(Self {
            original_point_count: original.len(),
            processed_point_count: processed.len(),
            compression_rate: 100.0 * removed as f64 / original.len() as f64,
            filtered_point_count: removed,
            coordinate_transform_count: 0,
            total_distance: kinematics.total_distance,
            total_time: kinematics.total_time,
            average_speed: kinematics.average_speed,
            max_speed: kinematics.max_speed,
            min_speed: kinematics.min_speed,
            start_point,
            end_point,
            bounding_box,
            processing_time_ms,
        })
    }

    /// Bounding box as `[min_lat, min_lng, max_lat, max_lng]`.
    pub fn bounding_box_array(&self) -> [f64; 4] {
        self.bounding_box.as_array()
    }

    /// Multi-line human readable report.
    pub fn to_formatted_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ProcessingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [min_lat, min_lng, max_lat, max_lng] = self.bounding_box_array();
        writeln!(f, "Trajectory summary:")?;
        writeln!(f, "Original points: {}", self.original_point_count)?;
        writeln!(f, "Processed points: {}", self.processed_point_count)?;
        writeln!(f, "Compression rate: {:.2}%", self.compression_rate)?;
        writeln!(f, "Filtered points: {}", self.filtered_point_count)?;
        writeln!(f, "Transformed points: {}", self.coordinate_transform_count)?;
        writeln!(f, "Total distance: {:.2} m", self.total_distance)?;
        writeln!(f, "Total time: {:.1} min", self.total_time as f64 / 60_000.0)?;
        writeln!(f, "Average speed: {:.2} km/h", self.average_speed)?;
        writeln!(f, "Max speed: {:.2} km/h", self.max_speed)?;
        writeln!(f, "Min speed: {:.2} km/h", self.min_speed)?;
        writeln!(
            f,
            "Start: ({:.6}, {:.6}) End: ({:.6}, {:.6})",
            self.start_point.latitude,
            self.start_point.longitude,
            self.end_point.latitude,
            self.end_point.longitude
        )?;
        writeln!(
            f,
            "Bounding box: [{:.6}, {:.6}, {:.6}, {:.6}]",
            min_lat, min_lng, max_lat, max_lng
        )?;
        write!(f, "Processing time: {} ms", self.processing_time_ms)
    }
}

/// Distance, time and speed aggregates over consecutive pairs.
#[derive(Debug, Default)]
struct Kinematics {
    total_distance: f64,
    total_time: u64,
    average_speed: f64,
    max_speed: f64,
    min_speed: f64,
}

impl Kinematics {
    fn from_points(points: &[GeoPoint]) -> Self {
        if points.len() < 2 {
            return Self::default();
        }

        let mut total_distance = 0.0;
        let mut total_time = 0u64;
        let mut speeds = Vec::with_capacity(points.len() - 1);

        for pair in points.windows(2) {
            let time_diff = pair[0].time_diff_to(&pair[1]);
            total_distance += haversine_distance(&pair[0], &pair[1]);
            total_time = total_time.saturating_add(time_diff);

            // Same-timestamp pairs have no defined speed
            if time_diff > 0 {
                speeds.push(pair[0].average_speed_to(&pair[1]));
            }
        }

        if speeds.is_empty() {
            return Self {
                total_distance,
                total_time,
                ..Self::default()
            };
        }

        Self {
            total_distance,
            total_time,
            average_speed: speeds.iter().sum::<f64>() / speeds.len() as f64,
            max_speed: speeds.iter().copied().fold(f64::MIN, f64::max),
            min_speed: speeds.iter().copied().fold(f64::MAX, f64::min),
        }
    }
}
