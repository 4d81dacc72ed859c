//! MJPEG stream publisher
//!
//! Handles the TCP accept loop and spawns one task per viewer connection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::config::SystemConfig;
use crate::stats::SystemStats;
use crate::video::{FrameBuffer, FrameReader};

/// Multipart boundary between successive JPEG stills
const BOUNDARY: &str = "frame";

/// Cap on the ignored request head; anything longer is a broken client
const HEAD_READ_LIMIT: usize = 8 * 1024;

/// Serves the latest frame to any number of concurrent viewers
pub struct StreamPublisher {
    buffer: Arc<FrameBuffer>,
    stats: Arc<SystemStats>,
    next_viewer_id: AtomicU64,
    viewer_semaphore: Option<Arc<Semaphore>>,
}

impl StreamPublisher {
    /// Create a publisher over the shared frame buffer
    pub fn new(config: &SystemConfig, buffer: Arc<FrameBuffer>, stats: Arc<SystemStats>) -> Self {
        let viewer_semaphore = if config.max_viewers > 0 {
            Some(Arc::new(Semaphore::new(config.max_viewers)))
        } else {
            None
        };

        Self {
            buffer,
            stats,
            next_viewer_id: AtomicU64::new(1),
            viewer_semaphore,
        }
    }

    /// Accept viewers on an already-bound listener until the task is dropped
    pub async fn serve(self, listener: TcpListener) {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    // Check viewer limit
                    let permit = if let Some(ref sem) = self.viewer_semaphore {
                        match sem.clone().try_acquire_owned() {
                            Ok(permit) => Some(permit),
                            Err(_) => {
                                tracing::warn!(peer = %peer_addr, "viewer rejected: limit reached");
                                continue;
                            }
                        }
                    } else {
                        None
                    };

                    let viewer_id = self.next_viewer_id.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(viewer_id = viewer_id, peer = %peer_addr, "viewer connected");
                    self.stats.record_viewer_served();

                    let frames = self.buffer.reader();
                    tokio::spawn(async move {
                        let _permit = permit;
                        if let Err(e) = serve_viewer(socket, frames).await {
                            tracing::debug!(viewer_id = viewer_id, error = %e, "viewer error");
                        }
                        tracing::debug!(viewer_id = viewer_id, "viewer disconnected");
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to accept viewer");
                }
            }
        }
    }
}

/// Stream stills to one viewer until it disconnects
async fn serve_viewer(mut socket: TcpStream, mut frames: FrameReader) -> std::io::Result<()> {
    consume_request_head(&mut socket).await?;

    socket
        .write_all(
            format!(
                "HTTP/1.1 200 OK\r\n\
                 Connection: close\r\n\
                 Cache-Control: no-store\r\n\
                 Content-Type: multipart/x-mixed-replace; boundary={}\r\n\r\n",
                BOUNDARY
            )
            .as_bytes(),
        )
        .await?;

    // Late joiners start from the newest existing frame instead of waiting
    // for the next capture
    let mut current = frames.latest();

    loop {
        let frame = match current.take() {
            Some(frame) => frame,
            // No frame yet: wait rather than emit malformed parts
            None => match frames.next().await {
                Some(frame) => frame,
                None => return Ok(()), // buffer gone, system shutting down
            },
        };

        let part_head = format!(
            "--{}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
            BOUNDARY,
            frame.data.len()
        );
        socket.write_all(part_head.as_bytes()).await?;
        socket.write_all(&frame.data).await?;
        socket.write_all(b"\r\n").await?;
    }
}

/// Read and discard the viewer's request head
///
/// Any request gets the stream; there is nothing to route on. Stops at the
/// blank line, at EOF, or at the size cap.
async fn consume_request_head(socket: &mut TcpStream) -> std::io::Result<()> {
    let mut head = Vec::with_capacity(512);
    let mut chunk = [0u8; 512];

    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        head.extend_from_slice(&chunk[..n]);

        if head.windows(4).any(|w| w == b"\r\n\r\n") || head.len() >= HEAD_READ_LIMIT {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::video::VideoFrame;

    async fn start_publisher(config: SystemConfig) -> (std::net::SocketAddr, Arc<FrameBuffer>) {
        let buffer = Arc::new(FrameBuffer::new());
        let stats = Arc::new(SystemStats::new());
        let publisher = StreamPublisher::new(&config, Arc::clone(&buffer), stats);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(publisher.serve(listener));

        (addr, buffer)
    }

    async fn read_until(socket: &mut TcpStream, needle: &[u8]) -> Vec<u8> {
        let mut seen = Vec::new();
        // Read one byte at a time so we stop exactly at the needle and leave
        // any following bytes buffered in the socket for the next call.
        let mut byte = [0u8; 1];
        loop {
            let n = socket.read(&mut byte).await.unwrap();
            assert!(n > 0, "connection closed before pattern appeared");
            seen.extend_from_slice(&byte[..n]);
            if seen
                .windows(needle.len())
                .any(|w| w == needle)
            {
                return seen;
            }
        }
    }

    #[tokio::test]
    async fn test_viewer_receives_multipart_stream() {
        let (addr, buffer) = start_publisher(SystemConfig::default()).await;

        buffer.publish(VideoFrame::new(
            1,
            Bytes::from_static(b"\xff\xd8first\xff\xd9"),
            320,
            240,
        ));

        let mut socket = TcpStream::connect(addr).await.unwrap();
        socket
            .write_all(b"GET /stream HTTP/1.1\r\nHost: x\r\n\r\n")
            .await
            .unwrap();

        let head = read_until(&mut socket, b"multipart/x-mixed-replace").await;
        assert!(head.starts_with(b"HTTP/1.1 200 OK"));

        // The pre-existing frame is served immediately
        let body = read_until(&mut socket, b"\xff\xd8first\xff\xd9").await;
        assert!(body
            .windows(8)
            .any(|w| w == b"--frame\r".as_ref()));

        // A newer frame follows without reconnecting
        buffer.publish(VideoFrame::new(
            2,
            Bytes::from_static(b"\xff\xd8second\xff\xd9"),
            320,
            240,
        ));
        read_until(&mut socket, b"\xff\xd8second\xff\xd9").await;
    }

    #[tokio::test]
    async fn test_viewer_waits_for_first_frame() {
        let (addr, buffer) = start_publisher(SystemConfig::default()).await;

        let mut socket = TcpStream::connect(addr).await.unwrap();
        socket.write_all(b"GET / HTTP/1.0\r\n\r\n").await.unwrap();

        // Headers arrive, then nothing until a frame exists
        read_until(&mut socket, b"\r\n\r\n").await;

        buffer.publish(VideoFrame::new(
            1,
            Bytes::from_static(b"\xff\xd8late\xff\xd9"),
            320,
            240,
        ));
        read_until(&mut socket, b"\xff\xd8late\xff\xd9").await;
    }

    #[tokio::test]
    async fn test_concurrent_viewers_served_independently() {
        let (addr, buffer) = start_publisher(SystemConfig::default()).await;

        buffer.publish(VideoFrame::new(
            1,
            Bytes::from_static(b"\xff\xd8shared\xff\xd9"),
            320,
            240,
        ));

        let mut a = TcpStream::connect(addr).await.unwrap();
        let mut b = TcpStream::connect(addr).await.unwrap();
        a.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
        b.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();

        read_until(&mut a, b"\xff\xd8shared\xff\xd9").await;
        read_until(&mut b, b"\xff\xd8shared\xff\xd9").await;
    }
}
