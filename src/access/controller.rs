//! State controller
//!
//! Sole authority over [`SystemState`] and the only component permitted to
//! invoke actuation. Handlers run synchronously with respect to the
//! recognition loop: the loop awaits them, which is what guarantees a
//! single action in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::actuator::{Actuator, Sequencer};
use crate::approval::{ApprovalChannel, ApprovalDecision, DecisionHandle, DecisionSlot};
use crate::config::SystemConfig;
use crate::snapshot::SnapshotStore;
use crate::stats::SystemStats;
use crate::video::VideoFrame;

use super::state::{StateCell, SystemState};

/// Owns the system state and orchestrates door, alarm, and approvals
pub struct StateController<A, C> {
    state: StateCell,
    sequencer: Sequencer<A>,
    channel: C,
    slot: Arc<DecisionSlot>,
    snapshots: SnapshotStore,
    approval_timeout: Duration,
    stats: Arc<SystemStats>,
}

impl<A: Actuator, C: ApprovalChannel> StateController<A, C> {
    /// Create a controller
    pub(crate) fn new(
        config: &SystemConfig,
        sequencer: Sequencer<A>,
        channel: C,
        snapshots: SnapshotStore,
        stats: Arc<SystemStats>,
    ) -> Self {
        Self {
            state: StateCell::new(),
            sequencer,
            channel,
            slot: Arc::new(DecisionSlot::new()),
            snapshots,
            approval_timeout: config.approval_timeout,
            stats,
        }
    }

    /// Current state
    pub fn state(&self) -> SystemState {
        self.state.get()
    }

    /// Subscribe to state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<SystemState> {
        self.state.subscribe()
    }

    /// Handle for the embedder's approval transport to deliver decisions
    pub fn decision_handle(&self) -> DecisionHandle {
        DecisionHandle::new(Arc::clone(&self.slot))
    }

    /// The authorized party is at the door: open it
    ///
    /// Actuator failure is logged, never propagated; the state returns to
    /// idle unconditionally so one bad servo command cannot lock the owner
    /// out forever.
    pub async fn handle_owner_detected(&self) {
        self.state.set(SystemState::Busy);
        self.stats.record_owner_admission();

        if let Err(e) = self.sequencer.open_door().await {
            tracing::error!(error = %e, "door sequence failed");
        }

        self.state.set(SystemState::Idle);
    }

    /// A stranger is at the door: ask the operator, bounded by the timeout
    ///
    /// Snapshot persistence and the request push may each fail; both are
    /// logged and the workflow continues, so silence still resolves through
    /// the timeout and alarm path.
    pub async fn handle_stranger_detected(&self, frame: &VideoFrame) {
        self.state.set(SystemState::AwaitingApproval);
        self.stats.record_stranger_request();

        if let Err(e) = self.snapshots.save(frame).await {
            tracing::warn!(error = %e, "could not persist stranger snapshot");
        }

        // Arm before pushing: the callback may fire before the push returns
        let rx = self.slot.arm().await;

        if let Err(e) = self.channel.push_request(frame).await {
            tracing::error!(error = %e, "approval request push failed");
        }

        let decision = self.slot.wait(rx, self.approval_timeout).await;
        tracing::info!(decision = %decision, "approval request resolved");

        if decision != ApprovalDecision::TimedOut {
            if let Err(e) = self.channel.acknowledge(decision).await {
                tracing::debug!(error = %e, "decision acknowledgement failed");
            }
        }

        match decision {
            ApprovalDecision::Approved => {
                self.stats.record_approval();
                self.state.set(SystemState::Busy);
                if let Err(e) = self.sequencer.open_door().await {
                    tracing::error!(error = %e, "door sequence failed");
                }
            }
            ApprovalDecision::Denied => {
                self.stats.record_denial();
            }
            ApprovalDecision::TimedOut => {
                self.stats.record_timeout();
                self.stats.record_alarm();
                if let Err(e) = self.sequencer.sound_alarm().await {
                    tracing::error!(error = %e, "alarm sequence failed");
                }
            }
        }

        self.state.set(SystemState::Idle);
    }
}
