//! In-process counters
//!
//! Shared across the capture task, recognition loop, controller, and stream
//! publisher. Relaxed ordering throughout: these are monitoring counters,
//! not synchronization.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for the running system
#[derive(Debug, Default)]
pub struct SystemStats {
    frames_captured: AtomicU64,
    capture_failures: AtomicU64,
    frames_evaluated: AtomicU64,
    owner_admissions: AtomicU64,
    stranger_requests: AtomicU64,
    approvals: AtomicU64,
    denials: AtomicU64,
    timeouts: AtomicU64,
    alarms: AtomicU64,
    viewers_served: AtomicU64,
}

impl SystemStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_frame_captured(&self) {
        self.frames_captured.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_capture_failure(&self) {
        self.capture_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_frame_evaluated(&self) {
        self.frames_evaluated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_owner_admission(&self) {
        self.owner_admissions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stranger_request(&self) {
        self.stranger_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_approval(&self) {
        self.approvals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_denial(&self) {
        self.denials.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_alarm(&self) {
        self.alarms.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_viewer_served(&self) {
        self.viewers_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a consistent-enough point-in-time copy of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_captured: self.frames_captured.load(Ordering::Relaxed),
            capture_failures: self.capture_failures.load(Ordering::Relaxed),
            frames_evaluated: self.frames_evaluated.load(Ordering::Relaxed),
            owner_admissions: self.owner_admissions.load(Ordering::Relaxed),
            stranger_requests: self.stranger_requests.load(Ordering::Relaxed),
            approvals: self.approvals.load(Ordering::Relaxed),
            denials: self.denials.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            alarms: self.alarms.load(Ordering::Relaxed),
            viewers_served: self.viewers_served.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SystemStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub frames_captured: u64,
    pub capture_failures: u64,
    pub frames_evaluated: u64,
    pub owner_admissions: u64,
    pub stranger_requests: u64,
    pub approvals: u64,
    pub denials: u64,
    pub timeouts: u64,
    pub alarms: u64,
    pub viewers_served: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = SystemStats::new();

        stats.record_frame_captured();
        stats.record_frame_captured();
        stats.record_owner_admission();
        stats.record_timeout();
        stats.record_alarm();

        let snap = stats.snapshot();
        assert_eq!(snap.frames_captured, 2);
        assert_eq!(snap.owner_admissions, 1);
        assert_eq!(snap.timeouts, 1);
        assert_eq!(snap.alarms, 1);
        assert_eq!(snap.denials, 0);
    }
}
