//! Wire format for the trajectory stream
//!
//! The upstream publisher sends one fixed-layout little-endian frame per
//! websocket binary message. A leading tag byte selects the layout:
//!
//! | Tag | Producer | Layout |
//! |-----|----------|--------|
//! | `1` | SLAM     | `[1..37)` 3x3 rotation matrix (f32), `[37..49)` translation (3x f32), `[49..53)` tracking state (i32), `[53..57)` message id (i32), `[57]` keyframe flag |
//! | `0` | Vehicle  | `[1..13)` translation (3x f32) |
//!
//! The rotation matrix is carried on the wire but not used by the viewer;
//! only the x/y components of the translation are plotted.
//!
//! Decoding is total: short frames and unknown tags produce typed errors
//! ([`MapVisError::FrameTooShort`], [`MapVisError::UnknownOriginTag`])
//! instead of panics, so a malformed frame never kills the stream.
//!
//! [`encode_slam_frame`] and [`encode_vehicle_frame`] build valid frames for
//! the mock source, tests, and benches.

use crate::error::{MapVisError, Result};
use crate::types::Origin;

/// Tag byte for vehicle odometry frames
pub const TAG_VEHICLE: u8 = 0;
/// Tag byte for SLAM pose frames
pub const TAG_SLAM: u8 = 1;

/// Byte offset of the translation vector in a SLAM frame
pub const SLAM_TRANSLATION_OFFSET: usize = 37;
/// Byte offset of the tracking state in a SLAM frame
pub const SLAM_STATE_OFFSET: usize = 49;
/// Byte offset of the message id in a SLAM frame
pub const SLAM_MESSAGE_OFFSET: usize = 53;
/// Byte offset of the keyframe flag in a SLAM frame
pub const SLAM_KEYFRAME_OFFSET: usize = 57;
/// Minimum length of a SLAM frame
pub const SLAM_FRAME_LEN: usize = 58;

/// Byte offset of the translation vector in a vehicle frame
pub const VEHICLE_TRANSLATION_OFFSET: usize = 1;
/// Minimum length of a vehicle frame
pub const VEHICLE_FRAME_LEN: usize = 13;

/// A decoded frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    /// Pose reported by the SLAM tracker
    Slam {
        /// Camera translation (x, y, z) in the map frame
        translation: [f32; 3],
        /// Tracker state code as reported upstream
        tracking_state: i32,
        /// Sequence id of the originating message
        message_id: i32,
        /// Whether this pose came from a keyframe
        is_keyframe: bool,
    },
    /// Position reported by the vehicle's odometry
    Vehicle {
        /// Vehicle translation (x, y, z) in the map frame
        translation: [f32; 3],
    },
}

impl Frame {
    /// Which producer this frame came from
    pub fn origin(&self) -> Origin {
        match self {
            Frame::Slam { .. } => Origin::Slam,
            Frame::Vehicle { .. } => Origin::Vehicle,
        }
    }

    /// The plotted (x, y) position
    pub fn position(&self) -> (f32, f32) {
        let t = match self {
            Frame::Slam { translation, .. } => translation,
            Frame::Vehicle { translation } => translation,
        };
        (t[0], t[1])
    }
}

/// Decode a raw binary message into a [`Frame`]
pub fn decode_frame(bytes: &[u8]) -> Result<Frame> {
    let tag = *bytes.first().ok_or(MapVisError::FrameTooShort {
        len: 0,
        need: VEHICLE_FRAME_LEN,
    })?;

    match tag {
        TAG_SLAM => {
            if bytes.len() < SLAM_FRAME_LEN {
                return Err(MapVisError::FrameTooShort {
                    len: bytes.len(),
                    need: SLAM_FRAME_LEN,
                });
            }
            Ok(Frame::Slam {
                translation: read_vec3(bytes, SLAM_TRANSLATION_OFFSET),
                tracking_state: read_i32(bytes, SLAM_STATE_OFFSET),
                message_id: read_i32(bytes, SLAM_MESSAGE_OFFSET),
                is_keyframe: bytes[SLAM_KEYFRAME_OFFSET] != 0,
            })
        }
        TAG_VEHICLE => {
            if bytes.len() < VEHICLE_FRAME_LEN {
                return Err(MapVisError::FrameTooShort {
                    len: bytes.len(),
                    need: VEHICLE_FRAME_LEN,
                });
            }
            Ok(Frame::Vehicle {
                translation: read_vec3(bytes, VEHICLE_TRANSLATION_OFFSET),
            })
        }
        other => Err(MapVisError::UnknownOriginTag(other)),
    }
}

/// Build a SLAM frame; the rotation matrix bytes are zeroed
pub fn encode_slam_frame(
    translation: [f32; 3],
    tracking_state: i32,
    message_id: i32,
    is_keyframe: bool,
) -> Vec<u8> {
    let mut buf = vec![0u8; SLAM_FRAME_LEN];
    buf[0] = TAG_SLAM;
    write_vec3(&mut buf, SLAM_TRANSLATION_OFFSET, translation);
    buf[SLAM_STATE_OFFSET..SLAM_STATE_OFFSET + 4].copy_from_slice(&tracking_state.to_le_bytes());
    buf[SLAM_MESSAGE_OFFSET..SLAM_MESSAGE_OFFSET + 4].copy_from_slice(&message_id.to_le_bytes());
    buf[SLAM_KEYFRAME_OFFSET] = is_keyframe as u8;
    buf
}

/// Build a vehicle odometry frame
pub fn encode_vehicle_frame(translation: [f32; 3]) -> Vec<u8> {
    let mut buf = vec![0u8; VEHICLE_FRAME_LEN];
    buf[0] = TAG_VEHICLE;
    write_vec3(&mut buf, VEHICLE_TRANSLATION_OFFSET, translation);
    buf
}

// Callers validate frame length before these run.
fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn read_vec3(bytes: &[u8], offset: usize) -> [f32; 3] {
    [
        read_f32(bytes, offset),
        read_f32(bytes, offset + 4),
        read_f32(bytes, offset + 8),
    ]
}

fn write_vec3(buf: &mut [u8], offset: usize, v: [f32; 3]) {
    for (i, component) in v.iter().enumerate() {
        buf[offset + i * 4..offset + i * 4 + 4].copy_from_slice(&component.to_le_bytes());
    }
}
