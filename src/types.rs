//! Core data types for MapVis-RS
//!
//! This module contains the fundamental data structures used throughout
//! the application for representing sample origins, decoded position
//! samples, and the per-origin trace state.
//!
//! # Main Types
//!
//! - [`Origin`] - Which upstream producer a sample came from (SLAM or vehicle)
//! - [`TraceSample`] - A single decoded, timestamped 2D position
//! - [`TraceSeries`] - Owned per-origin trace state: accepted points, running
//!   bounds, and the distance-based dedup filter
//! - [`StreamStats`] - Counters describing the health of the stream
//!
//! # Dedup Filter
//!
//! Samples closer than [`DEFAULT_DEDUP_MIN_DISTANCE`] to the last accepted
//! point are suppressed before rendering. The first [`DEDUP_WARMUP`] points
//! of a series are always accepted so the trace gets off the ground. The two
//! series filter independently.
//!
//! # Memory Management
//!
//! Accepted points live in a ring buffer capped at [`MAX_TRACE_POINTS`];
//! when full, the oldest point is evicted. Bounds are never shrunk by
//! eviction — they track everything the stream has reported.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Maximum number of accepted points retained per trace
pub const MAX_TRACE_POINTS: usize = 100_000;

/// Minimum Euclidean distance to the last accepted point for a new point
/// to be kept
pub const DEFAULT_DEDUP_MIN_DISTANCE: f64 = 1e-4;

/// Number of initial points accepted unconditionally
pub const DEDUP_WARMUP: usize = 4;

/// Which upstream producer a sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// The SLAM tracker's pose estimate
    Slam,
    /// The vehicle's own odometry
    Vehicle,
}

impl Origin {
    /// Both origins, in display order
    pub fn all() -> &'static [Origin] {
        &[Origin::Slam, Origin::Vehicle]
    }

    /// Display color (RGB), chosen to read on both light and dark themes
    pub fn color(&self) -> [u8; 3] {
        match self {
            Origin::Slam => [86, 156, 214],
            Origin::Vehicle => [220, 150, 86],
        }
    }

    /// Stable index for per-origin arrays
    pub fn index(&self) -> usize {
        match self {
            Origin::Slam => 0,
            Origin::Vehicle => 1,
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Slam => write!(f, "SLAM"),
            Origin::Vehicle => write!(f, "Vehicle"),
        }
    }
}

/// A single decoded 2D position sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSample {
    /// Which producer reported this position
    pub origin: Origin,
    /// X position in the map frame, meters
    pub x: f32,
    /// Y position in the map frame, meters
    pub y: f32,
    /// Time since collection started
    pub timestamp: Duration,
}

impl TraceSample {
    /// Create a new sample
    pub fn new(origin: Origin, x: f32, y: f32, timestamp: Duration) -> Self {
        Self {
            origin,
            x,
            y,
            timestamp,
        }
    }
}

/// Running axis-aligned bounds over every sample seen
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl Bounds {
    /// Create empty bounds that any point will expand
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand the bounds to cover a point
    #[inline]
    pub fn update(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// True once at least one point has been recorded
    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite() && self.min_y.is_finite()
    }

    /// Width of the covered range
    pub fn span_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the covered range
    pub fn span_y(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Owned trace state for a single origin
///
/// Holds the ordered sequence of accepted points plus running bounds.
/// Bounds are updated for every sample, including ones the dedup filter
/// rejects, so the plot window covers everything the stream reported.
#[derive(Debug)]
pub struct TraceSeries {
    /// Which origin this series belongs to
    pub origin: Origin,
    /// Ring buffer of accepted points
    points: VecDeque<[f64; 2]>,
    /// Running min/max over all samples seen
    pub bounds: Bounds,
    /// Minimum distance to the last accepted point
    pub dedup_min_distance: f64,
    /// Number of samples accepted into the trace
    pub accepted: u64,
    /// Number of samples suppressed by the dedup filter
    pub rejected: u64,
}

impl TraceSeries {
    /// Create an empty series with the default dedup threshold
    pub fn new(origin: Origin) -> Self {
        Self::with_dedup_distance(origin, DEFAULT_DEDUP_MIN_DISTANCE)
    }

    /// Create an empty series with a specific dedup threshold
    pub fn with_dedup_distance(origin: Origin, dedup_min_distance: f64) -> Self {
        Self {
            origin,
            points: VecDeque::new(),
            bounds: Bounds::new(),
            dedup_min_distance,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Feed a sample into the series
    ///
    /// Bounds always expand. The point is appended unless its Euclidean
    /// distance to the last accepted point is below the dedup threshold;
    /// the first [`DEDUP_WARMUP`] points are always appended. Returns
    /// whether the point was accepted.
    pub fn push(&mut self, x: f64, y: f64) -> bool {
        self.bounds.update(x, y);

        if self.points.len() >= DEDUP_WARMUP {
            if let Some(last) = self.points.back() {
                let dist = ((x - last[0]).powi(2) + (y - last[1]).powi(2)).sqrt();
                if dist < self.dedup_min_distance {
                    self.rejected += 1;
                    return false;
                }
            }
        }

        if self.points.len() >= MAX_TRACE_POINTS {
            self.points.pop_front();
        }
        self.points.push_back([x, y]);
        self.accepted += 1;
        true
    }

    /// Feed a decoded sample into the series
    pub fn push_sample(&mut self, sample: &TraceSample) -> bool {
        debug_assert_eq!(sample.origin, self.origin);
        self.push(sample.x as f64, sample.y as f64)
    }

    /// Accepted points in arrival order, for plotting
    pub fn as_plot_points(&self) -> Vec<[f64; 2]> {
        self.points.iter().copied().collect()
    }

    /// Most recently accepted point
    pub fn last_point(&self) -> Option<[f64; 2]> {
        self.points.back().copied()
    }

    /// Number of points currently held
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no points have been accepted yet
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop all points and reset bounds and counters
    pub fn clear(&mut self) {
        self.points.clear();
        self.bounds = Bounds::new();
        self.accepted = 0;
        self.rejected = 0;
    }
}

/// Represents the connection status to the stream source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Not connected to any source
    #[default]
    Disconnected,
    /// Attempting to connect
    Connecting,
    /// Connected and streaming
    Connected,
    /// Connection error occurred
    Error,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
            ConnectionStatus::Connecting => write!(f, "Connecting..."),
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::Error => write!(f, "Error"),
        }
    }
}

/// Statistics about the stream
#[derive(Debug, Clone, Default)]
pub struct StreamStats {
    /// Binary frames pulled off the socket
    pub frames_received: u64,
    /// Frames that decoded cleanly
    pub frames_decoded: u64,
    /// Frames rejected by the decoder
    pub decode_errors: u64,
    /// Samples forwarded to the UI
    pub samples_emitted: u64,
    /// Samples skipped by the per-origin stride
    pub samples_throttled: u64,
    /// Total payload bytes received
    pub bytes_received: u64,
    /// SLAM frames flagged as keyframes
    pub keyframes: u64,
    /// Messages dropped due to channel backpressure
    pub dropped_messages: u64,
    /// Observed frame rate over the last stats interval, Hz
    pub frame_rate: f64,
}

impl StreamStats {
    /// Fraction of received frames that decoded, as a percentage
    pub fn decode_success_rate(&self) -> f64 {
        if self.frames_received == 0 {
            100.0
        } else {
            (self.frames_decoded as f64 / self.frames_received as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_index_roundtrip() {
        for origin in Origin::all() {
            assert_eq!(Origin::all()[origin.index()], *origin);
        }
    }

    #[test]
    fn test_bounds_update() {
        let mut bounds = Bounds::new();
        assert!(!bounds.is_valid());

        bounds.update(1.0, -2.0);
        bounds.update(-3.0, 4.0);

        assert!(bounds.is_valid());
        assert_eq!(bounds.min_x, -3.0);
        assert_eq!(bounds.max_x, 1.0);
        assert_eq!(bounds.min_y, -2.0);
        assert_eq!(bounds.max_y, 4.0);
        assert_eq!(bounds.span_x(), 4.0);
        assert_eq!(bounds.span_y(), 6.0);
    }

    #[test]
    fn test_series_warmup_accepts_duplicates() {
        let mut series = TraceSeries::new(Origin::Slam);

        // Identical points are accepted until the warmup window fills
        for _ in 0..DEDUP_WARMUP {
            assert!(series.push(1.0, 1.0));
        }
        assert!(!series.push(1.0, 1.0));
        assert_eq!(series.len(), DEDUP_WARMUP);
        assert_eq!(series.rejected, 1);
    }

    #[test]
    fn test_series_dedup_threshold() {
        let mut series = TraceSeries::new(Origin::Vehicle);
        for i in 0..DEDUP_WARMUP {
            series.push(i as f64, 0.0);
        }
        let last = series.last_point().unwrap();

        // Just inside the threshold: rejected
        assert!(!series.push(last[0] + 0.5e-4, last[1]));
        // Clearly outside: accepted
        assert!(series.push(last[0] + 1.0, last[1]));
    }

    #[test]
    fn test_series_are_independent() {
        let mut slam = TraceSeries::new(Origin::Slam);
        let mut vehicle = TraceSeries::new(Origin::Vehicle);

        for i in 0..DEDUP_WARMUP {
            slam.push(i as f64, 0.0);
            vehicle.push(0.0, i as f64);
        }

        // A rejection in one series does not affect the other
        let slam_last = slam.last_point().unwrap();
        assert!(!slam.push(slam_last[0], slam_last[1]));
        assert!(vehicle.push(100.0, 100.0));
    }

    #[test]
    fn test_series_bounds_cover_rejected_points() {
        // A huge threshold rejects a distant point; bounds must still cover it
        let mut coarse = TraceSeries::with_dedup_distance(Origin::Slam, 1000.0);
        for _ in 0..DEDUP_WARMUP {
            coarse.push(0.0, 0.0);
        }
        assert!(!coarse.push(50.0, -50.0));
        assert_eq!(coarse.bounds.max_x, 50.0);
        assert_eq!(coarse.bounds.min_y, -50.0);
    }

    #[test]
    fn test_series_ring_buffer_cap() {
        let mut series = TraceSeries::with_dedup_distance(Origin::Vehicle, 0.0);
        for i in 0..(MAX_TRACE_POINTS + 10) {
            series.push(i as f64, 0.0);
        }
        assert_eq!(series.len(), MAX_TRACE_POINTS);
        // Oldest points were evicted
        assert_eq!(series.as_plot_points()[0][0], 10.0);
    }

    #[test]
    fn test_series_clear() {
        let mut series = TraceSeries::new(Origin::Slam);
        series.push(1.0, 2.0);
        series.clear();
        assert!(series.is_empty());
        assert!(!series.bounds.is_valid());
        assert_eq!(series.accepted, 0);
    }

    #[test]
    fn test_stream_stats_success_rate() {
        let mut stats = StreamStats::default();
        assert_eq!(stats.decode_success_rate(), 100.0);

        stats.frames_received = 10;
        stats.frames_decoded = 9;
        assert!((stats.decode_success_rate() - 90.0).abs() < 1e-9);
    }
}
