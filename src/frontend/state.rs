//! UI-side stream state
//!
//! [`TraceStore`] is the owned state struct the backend messages are applied
//! to: one [`TraceSeries`] per origin plus the latest connection status,
//! stream statistics, and error text. It is pure data so it can be tested
//! without an egui context.

use crate::backend::BackendMessage;
use crate::types::{ConnectionStatus, Origin, StreamStats, TraceSeries};

/// Everything the UI renders, accumulated from backend messages
pub struct TraceStore {
    /// SLAM trace
    pub slam: TraceSeries,
    /// Vehicle odometry trace
    pub vehicle: TraceSeries,
    /// Latest connection status
    pub connection_status: ConnectionStatus,
    /// Latest stream statistics
    pub stats: StreamStats,
    /// Most recent connection or decode error, if any
    pub last_error: Option<String>,
}

impl TraceStore {
    /// Create an empty store with the given dedup threshold
    pub fn new(dedup_min_distance: f64) -> Self {
        Self {
            slam: TraceSeries::with_dedup_distance(Origin::Slam, dedup_min_distance),
            vehicle: TraceSeries::with_dedup_distance(Origin::Vehicle, dedup_min_distance),
            connection_status: ConnectionStatus::Disconnected,
            stats: StreamStats::default(),
            last_error: None,
        }
    }

    /// The series for an origin
    pub fn series(&self, origin: Origin) -> &TraceSeries {
        match origin {
            Origin::Slam => &self.slam,
            Origin::Vehicle => &self.vehicle,
        }
    }

    /// The series for an origin, mutably
    pub fn series_mut(&mut self, origin: Origin) -> &mut TraceSeries {
        match origin {
            Origin::Slam => &mut self.slam,
            Origin::Vehicle => &mut self.vehicle,
        }
    }

    /// Apply one backend message; returns whether anything visible changed
    pub fn apply(&mut self, msg: BackendMessage) -> bool {
        match msg {
            BackendMessage::Sample(sample) => {
                self.series_mut(sample.origin).push_sample(&sample)
            }
            BackendMessage::ConnectionStatus(status) => {
                if status == ConnectionStatus::Connected {
                    self.last_error = None;
                }
                self.connection_status = status;
                true
            }
            BackendMessage::ConnectionError(error) => {
                self.last_error = Some(error);
                true
            }
            BackendMessage::DecodeError(error) => {
                self.last_error = Some(error);
                true
            }
            BackendMessage::Stats(stats) => {
                self.stats = stats;
                true
            }
            BackendMessage::Shutdown => false,
        }
    }

    /// Drop all trace data and error state
    pub fn clear(&mut self) {
        self.slam.clear();
        self.vehicle.clear();
        self.stats = StreamStats::default();
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TraceSample, DEFAULT_DEDUP_MIN_DISTANCE};
    use std::time::Duration;

    fn sample(origin: Origin, x: f32, y: f32) -> BackendMessage {
        BackendMessage::Sample(TraceSample::new(origin, x, y, Duration::ZERO))
    }

    #[test]
    fn test_samples_route_to_their_series() {
        let mut store = TraceStore::new(DEFAULT_DEDUP_MIN_DISTANCE);

        assert!(store.apply(sample(Origin::Slam, 1.0, 2.0)));
        assert!(store.apply(sample(Origin::Vehicle, -1.0, -2.0)));

        assert_eq!(store.slam.len(), 1);
        assert_eq!(store.vehicle.len(), 1);
        assert_eq!(store.slam.last_point(), Some([1.0, 2.0]));
        assert_eq!(store.vehicle.last_point(), Some([-1.0, -2.0]));
    }

    #[test]
    fn test_connection_error_then_connect_clears_error() {
        let mut store = TraceStore::new(DEFAULT_DEDUP_MIN_DISTANCE);

        store.apply(BackendMessage::ConnectionError("boom".to_string()));
        assert_eq!(store.last_error.as_deref(), Some("boom"));

        store.apply(BackendMessage::ConnectionStatus(ConnectionStatus::Connected));
        assert!(store.last_error.is_none());
        assert_eq!(store.connection_status, ConnectionStatus::Connected);
    }

    #[test]
    fn test_stats_update() {
        let mut store = TraceStore::new(DEFAULT_DEDUP_MIN_DISTANCE);

        let mut stats = StreamStats::default();
        stats.frames_received = 7;
        store.apply(BackendMessage::Stats(stats));

        assert_eq!(store.stats.frames_received, 7);
    }

    #[test]
    fn test_clear_preserves_connection_status() {
        // Clearing trace data must not make a live connection look closed;
        // the backend only reports status on transitions
        let mut store = TraceStore::new(DEFAULT_DEDUP_MIN_DISTANCE);
        store.apply(BackendMessage::ConnectionStatus(ConnectionStatus::Connected));
        store.apply(sample(Origin::Slam, 1.0, 2.0));

        store.clear();
        assert_eq!(store.connection_status, ConnectionStatus::Connected);
        assert!(store.slam.is_empty());

        // Samples arriving after the clear still accumulate
        assert!(store.apply(sample(Origin::Slam, 3.0, 4.0)));
        assert_eq!(store.slam.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = TraceStore::new(DEFAULT_DEDUP_MIN_DISTANCE);
        store.apply(sample(Origin::Slam, 1.0, 2.0));
        store.apply(BackendMessage::ConnectionError("x".to_string()));

        store.clear();
        assert!(store.slam.is_empty());
        assert!(store.vehicle.is_empty());
        assert!(store.last_error.is_none());
    }
}
