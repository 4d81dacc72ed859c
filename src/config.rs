//! System configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Lock angle commanded when the door is held open (degrees)
pub const DEFAULT_OPEN_ANGLE: f32 = 125.0;

/// Lock angle commanded when the door is secured (degrees)
pub const DEFAULT_CLOSED_ANGLE: f32 = 77.0;

/// Configuration for the access controller
#[derive(Debug, Clone)]
pub struct SystemConfig {
    /// Address the MJPEG stream publisher binds to
    pub bind_addr: SocketAddr,

    /// Maximum concurrent stream viewers (0 = unlimited)
    pub max_viewers: usize,

    /// Run identity matching only every Nth captured frame
    pub skip_factor: u32,

    /// Pacing of the capture loop
    pub capture_interval: Duration,

    /// Bounded wait for a remote approval decision
    pub approval_timeout: Duration,

    /// How long the door stays open before re-locking
    pub door_hold: Duration,

    /// How long the alarm sounds after an unanswered request
    pub alarm_hold: Duration,

    /// Lock angle for the open position (degrees)
    pub open_angle: f32,

    /// Lock angle for the locked position (degrees)
    pub closed_angle: f32,

    /// Directory where stranger snapshots are persisted
    pub snapshot_dir: PathBuf,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".parse().unwrap(),
            max_viewers: 0, // Unlimited
            skip_factor: 5,
            capture_interval: Duration::from_millis(100), // 10 fps
            approval_timeout: Duration::from_secs(5),
            door_hold: Duration::from_secs(5),
            alarm_hold: Duration::from_secs(3),
            open_angle: DEFAULT_OPEN_ANGLE,
            closed_angle: DEFAULT_CLOSED_ANGLE,
            snapshot_dir: PathBuf::from("unknown_faces"),
        }
    }
}

impl SystemConfig {
    /// Create a new config with a custom stream bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the stream bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the maximum number of concurrent viewers
    pub fn max_viewers(mut self, max: usize) -> Self {
        self.max_viewers = max;
        self
    }

    /// Set the frame skip factor (minimum 1 = evaluate every frame)
    pub fn skip_factor(mut self, n: u32) -> Self {
        self.skip_factor = n.max(1);
        self
    }

    /// Set the capture loop pacing
    pub fn capture_interval(mut self, interval: Duration) -> Self {
        self.capture_interval = interval;
        self
    }

    /// Set the approval wait window
    pub fn approval_timeout(mut self, timeout: Duration) -> Self {
        self.approval_timeout = timeout;
        self
    }

    /// Set the door hold duration
    pub fn door_hold(mut self, hold: Duration) -> Self {
        self.door_hold = hold;
        self
    }

    /// Set the alarm hold duration
    pub fn alarm_hold(mut self, hold: Duration) -> Self {
        self.alarm_hold = hold;
        self
    }

    /// Set the open/locked lock angles
    pub fn lock_angles(mut self, open: f32, closed: f32) -> Self {
        self.open_angle = open;
        self.closed_angle = closed;
        self
    }

    /// Set the stranger snapshot directory
    pub fn snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }
}
