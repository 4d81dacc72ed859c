//! Capture device capability

use std::future::Future;

use crate::error::Result;

use super::frame::VideoFrame;

/// Abstraction over the camera
///
/// An error from [`capture`](FrameSource::capture) is a transient condition:
/// the capture loop logs it and retries on the next cycle. A device that is
/// permanently gone at startup should fail construction in the embedder
/// instead, before the system starts.
pub trait FrameSource: Send + 'static {
    /// Produce the next frame
    fn capture(&mut self) -> impl Future<Output = Result<VideoFrame>> + Send;
}
