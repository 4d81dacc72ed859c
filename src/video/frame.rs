//! Captured frame type

use std::time::Instant;

use bytes::Bytes;

/// A single captured frame
///
/// The payload is a complete JPEG image as delivered by the capture device
/// (cameras in MJPG mode hand these out directly). Cheap to clone: `Bytes`
/// is reference-counted, so the buffer, snapshot persistence, and every
/// stream viewer share one allocation.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Monotonic capture sequence number
    pub seq: u64,
    /// JPEG-encoded image data
    pub data: Bytes,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// When the frame was captured
    pub captured_at: Instant,
}

impl VideoFrame {
    /// Create a new frame stamped with the current time
    pub fn new(seq: u64, data: Bytes, width: u32, height: u32) -> Self {
        Self {
            seq,
            data,
            width,
            height,
            captured_at: Instant::now(),
        }
    }

    /// Payload size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}
