//! Mock sample source for testing without a live robot
//!
//! Synthesizes an interleaved SLAM/vehicle frame stream: both producers
//! follow a circular path, with the vehicle trace offset slightly so the two
//! plots are distinguishable. Every tenth SLAM frame is flagged as a
//! keyframe and the SLAM tracking state is held at `2` (tracking OK).
//!
//! Only available with the `mock-source` feature:
//!
//! ```bash
//! cargo run --features mock-source
//! ```

use crate::error::{MapVisError, Result};
use crate::protocol::{encode_slam_frame, encode_vehicle_frame};
use std::time::Duration;

use super::source::SampleSource;

/// Interval between synthesized frames
const FRAME_INTERVAL: Duration = Duration::from_millis(10);

/// Angular step per frame along the synthetic path, radians
const ANGULAR_STEP: f64 = 0.02;

/// Radius of the synthetic circular path, meters
const PATH_RADIUS: f64 = 2.0;

/// Sample source that synthesizes a circular trajectory
pub struct MockSource {
    connected: bool,
    /// Frames emitted so far; drives the path position and origin interleave
    frame_count: u64,
}

impl MockSource {
    /// Create a disconnected mock source
    pub fn new() -> Self {
        Self {
            connected: false,
            frame_count: 0,
        }
    }

    fn next_frame(&mut self) -> Vec<u8> {
        let n = self.frame_count;
        self.frame_count += 1;

        let angle = (n / 2) as f64 * ANGULAR_STEP;
        let x = (PATH_RADIUS * angle.cos()) as f32;
        let y = (PATH_RADIUS * angle.sin()) as f32;

        if n % 2 == 0 {
            let is_keyframe = (n / 2) % 10 == 0;
            encode_slam_frame([x, y, 0.0], 2, (n / 2) as i32, is_keyframe)
        } else {
            // Vehicle odometry runs a hair wide of the SLAM estimate
            encode_vehicle_frame([x + 0.05, y - 0.05, 0.0])
        }
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for MockSource {
    fn connect(&mut self, url: &str) -> Result<()> {
        tracing::info!("Mock source connected (ignoring url {})", url);
        self.connected = true;
        self.frame_count = 0;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn recv_frame(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>> {
        if !self.connected {
            return Err(MapVisError::StreamClosed);
        }
        std::thread::sleep(FRAME_INTERVAL.min(timeout));
        Ok(Some(self.next_frame()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{decode_frame, Frame};
    use crate::types::Origin;

    #[test]
    fn test_mock_source_alternates_origins() {
        let mut source = MockSource::new();
        source.connect("ws://ignored").unwrap();

        let first = source.recv_frame(Duration::from_millis(1)).unwrap().unwrap();
        let second = source.recv_frame(Duration::from_millis(1)).unwrap().unwrap();

        assert_eq!(decode_frame(&first).unwrap().origin(), Origin::Slam);
        assert_eq!(decode_frame(&second).unwrap().origin(), Origin::Vehicle);
    }

    #[test]
    fn test_mock_source_keyframe_cadence() {
        let mut source = MockSource::new();
        source.connect("ws://ignored").unwrap();

        let frame = source.recv_frame(Duration::from_millis(1)).unwrap().unwrap();
        match decode_frame(&frame).unwrap() {
            Frame::Slam { is_keyframe, .. } => assert!(is_keyframe),
            _ => panic!("first frame should be SLAM"),
        }
    }

    #[test]
    fn test_mock_source_requires_connect() {
        let mut source = MockSource::new();
        assert!(source.recv_frame(Duration::from_millis(1)).is_err());
    }
}
