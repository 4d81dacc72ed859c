//! Shared latest-frame buffer
//!
//! A single-slot buffer over `tokio::sync::watch`: the writer replaces the
//! slot on every capture and never blocks on readers, and a reader observes
//! either the newest completed write or `None` before the first capture.
//! Slow readers skip straight to the newest frame; there is no queueing.

use tokio::sync::watch;

use super::frame::VideoFrame;

/// Writer side of the shared frame slot
///
/// Owned by the capture task (via `Arc`); readers are handed out with
/// [`reader`](FrameBuffer::reader).
#[derive(Debug)]
pub struct FrameBuffer {
    tx: watch::Sender<Option<VideoFrame>>,
}

impl FrameBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Replace the buffered frame with a newer one
    ///
    /// Never blocks and never fails, even with no readers attached.
    pub fn publish(&self, frame: VideoFrame) {
        self.tx.send_replace(Some(frame));
    }

    /// Get the newest frame, if any has been captured yet
    pub fn latest(&self) -> Option<VideoFrame> {
        self.tx.borrow().clone()
    }

    /// Create an independent reader over the buffer
    pub fn reader(&self) -> FrameReader {
        FrameReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader side of the shared frame slot
///
/// Each consumer (stream viewer, recognition loop) holds its own reader;
/// they never contend with the writer or with each other.
#[derive(Debug)]
pub struct FrameReader {
    rx: watch::Receiver<Option<VideoFrame>>,
}

impl FrameReader {
    /// Get the newest frame without waiting, marking it as seen
    pub fn latest(&mut self) -> Option<VideoFrame> {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for a frame newer than the last one seen
    ///
    /// Returns `None` only when the buffer has been dropped, which ends the
    /// consumer's loop.
    pub async fn next(&mut self) -> Option<VideoFrame> {
        loop {
            if self.rx.changed().await.is_err() {
                return None;
            }
            // The slot starts out empty; skip the initial None
            if let Some(frame) = self.rx.borrow_and_update().clone() {
                return Some(frame);
            }
        }
    }
}
