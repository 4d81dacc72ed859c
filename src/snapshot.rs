//! Stranger snapshot persistence
//!
//! Every stranger detection writes the triggering frame to a dedicated
//! directory before the approval request goes out. Filenames are
//! time-derived with a per-process sequence suffix so same-second
//! detections never collide. Nothing here is ever cleaned up; retention is
//! someone else's policy.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::video::VideoFrame;

/// Persists stranger frames to local storage
#[derive(Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
    seq: AtomicU64,
}

impl SnapshotStore {
    /// Open a store, creating the directory if needed
    ///
    /// Failure here is startup-fatal: a controller that cannot record who
    /// it asked about must not start.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            seq: AtomicU64::new(0),
        })
    }

    /// The directory snapshots are written into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one frame, returning the path it landed at
    pub async fn save(&self, frame: &VideoFrame) -> Result<PathBuf> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let n = self.seq.fetch_add(1, Ordering::Relaxed);

        let path = self.dir.join(format!("stranger_{}_{:04}.jpg", secs, n));
        tokio::fs::write(&path, &frame.data).await?;

        tracing::debug!(path = %path.display(), bytes = frame.size(), "snapshot persisted");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("facegate-snap-{}-{}", tag, std::process::id()))
    }

    #[tokio::test]
    async fn test_save_writes_frame_data() {
        let store = SnapshotStore::open(temp_dir("write")).unwrap();
        let frame = VideoFrame::new(1, Bytes::from_static(b"\xff\xd8fake\xff\xd9"), 320, 240);

        let path = store.save(&frame).await.unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, frame.data.as_ref());
    }

    #[tokio::test]
    async fn test_same_second_saves_get_unique_names() {
        let store = SnapshotStore::open(temp_dir("unique")).unwrap();
        let frame = VideoFrame::new(1, Bytes::from_static(b"x"), 320, 240);

        let a = store.save(&frame).await.unwrap();
        let b = store.save(&frame).await.unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = temp_dir("create").join("nested");
        let store = SnapshotStore::open(&dir).unwrap();

        assert!(store.dir().is_dir());
    }
}
