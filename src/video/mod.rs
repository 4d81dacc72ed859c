//! Frame types, the shared latest-frame buffer, and the capture capability
//!
//! The capture task is the single writer of the [`FrameBuffer`]; the stream
//! publisher and the recognition loop each consume it through their own
//! [`FrameReader`]. No frame history is kept anywhere: a reader sees the
//! newest completed write or nothing at all.

pub mod buffer;
pub mod frame;
pub mod source;

pub use buffer::{FrameBuffer, FrameReader};
pub use frame::VideoFrame;
pub use source::FrameSource;
