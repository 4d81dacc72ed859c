//! Shared decision slot
//!
//! At most one approval request is outstanding at a time (the controller
//! gates on `SystemState`), so the slot holds at most one armed oneshot
//! sender. Arming replaces any stale sender, and a resolution that finds no
//! armed sender (or a sender whose waiter already gave up) is discarded,
//! never applied to a later request.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};

use super::decision::ApprovalDecision;

/// What happened to a decision handed to the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The decision reached the waiting request
    Delivered,
    /// No request was waiting (none outstanding, or it already timed out)
    Discarded,
}

/// Single-occupancy slot for the in-flight approval decision
#[derive(Debug)]
pub struct DecisionSlot {
    pending: Mutex<Option<oneshot::Sender<ApprovalDecision>>>,
}

impl DecisionSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
        }
    }

    /// Arm the slot for a new request, returning the receiver to wait on
    ///
    /// Any previously armed sender is dropped here, so the slot is clean
    /// before each request goes out.
    pub(crate) async fn arm(&self) -> oneshot::Receiver<ApprovalDecision> {
        let (tx, rx) = oneshot::channel();
        if self.pending.lock().await.replace(tx).is_some() {
            tracing::warn!("stale approval sender replaced while arming");
        }
        rx
    }

    /// Wait for the armed decision, bounded by `window`
    ///
    /// On timeout the receiver is dropped and the slot disarmed, so a late
    /// resolution cannot reach this or any subsequent request.
    pub(crate) async fn wait(
        &self,
        rx: oneshot::Receiver<ApprovalDecision>,
        window: Duration,
    ) -> ApprovalDecision {
        match tokio::time::timeout(window, rx).await {
            // resolve() already emptied the slot on delivery
            Ok(Ok(decision)) => decision,
            Ok(Err(_)) => {
                // Sender dropped without a decision (superseded request)
                tracing::warn!("approval sender dropped without decision");
                ApprovalDecision::TimedOut
            }
            Err(_) => {
                self.pending.lock().await.take();
                ApprovalDecision::TimedOut
            }
        }
    }

    /// Deliver an operator decision to the outstanding request, if any
    pub(crate) async fn resolve(&self, decision: ApprovalDecision) -> ResolveOutcome {
        match self.pending.lock().await.take() {
            Some(tx) => match tx.send(decision) {
                Ok(()) => ResolveOutcome::Delivered,
                Err(_) => {
                    // Waiter already timed out and dropped the receiver
                    tracing::debug!(decision = %decision, "late decision discarded");
                    ResolveOutcome::Discarded
                }
            },
            None => {
                tracing::debug!(decision = %decision, "decision with no request outstanding");
                ResolveOutcome::Discarded
            }
        }
    }
}

impl Default for DecisionSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle the embedder gives to its approval channel
///
/// The inbound callback context only ever reaches the decision slot through
/// this handle, never `SystemState` or the actuator.
#[derive(Debug, Clone)]
pub struct DecisionHandle {
    slot: Arc<DecisionSlot>,
}

impl DecisionHandle {
    pub(crate) fn new(slot: Arc<DecisionSlot>) -> Self {
        Self { slot }
    }

    /// Deliver an operator decision
    ///
    /// Returns whether the decision reached a waiting request or was
    /// discarded as stale.
    pub async fn resolve(&self, decision: ApprovalDecision) -> ResolveOutcome {
        self.slot.resolve(decision).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delivered_decision() {
        let slot = DecisionSlot::new();
        let rx = slot.arm().await;

        let outcome = slot.resolve(ApprovalDecision::Approved).await;
        assert_eq!(outcome, ResolveOutcome::Delivered);

        let decision = slot.wait(rx, Duration::from_secs(5)).await;
        assert_eq!(decision, ApprovalDecision::Approved);
    }

    #[tokio::test]
    async fn test_resolve_without_request() {
        let slot = DecisionSlot::new();

        let outcome = slot.resolve(ApprovalDecision::Approved).await;
        assert_eq!(outcome, ResolveOutcome::Discarded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_then_late_decision() {
        let slot = DecisionSlot::new();
        let rx = slot.arm().await;

        let decision = slot.wait(rx, Duration::from_secs(5)).await;
        assert_eq!(decision, ApprovalDecision::TimedOut);

        // The operator answers after the window closed
        let outcome = slot.resolve(ApprovalDecision::Approved).await;
        assert_eq!(outcome, ResolveOutcome::Discarded);

        // A fresh request is unaffected by the stale answer
        let rx = slot.arm().await;
        let outcome = slot.resolve(ApprovalDecision::Denied).await;
        assert_eq!(outcome, ResolveOutcome::Delivered);
        let decision = slot.wait(rx, Duration::from_secs(5)).await;
        assert_eq!(decision, ApprovalDecision::Denied);
    }

    #[tokio::test]
    async fn test_exactly_once_consumption() {
        let slot = DecisionSlot::new();
        let rx = slot.arm().await;

        assert_eq!(
            slot.resolve(ApprovalDecision::Approved).await,
            ResolveOutcome::Delivered
        );
        // A second resolution for the same request finds the slot empty
        assert_eq!(
            slot.resolve(ApprovalDecision::Denied).await,
            ResolveOutcome::Discarded
        );

        let decision = slot.wait(rx, Duration::from_secs(5)).await;
        assert_eq!(decision, ApprovalDecision::Approved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_decision_races_deadline() {
        let slot = Arc::new(DecisionSlot::new());
        let rx = slot.arm().await;

        let resolver = Arc::clone(&slot);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            resolver.resolve(ApprovalDecision::Approved).await;
        });

        let decision = slot.wait(rx, Duration::from_secs(5)).await;
        assert_eq!(decision, ApprovalDecision::Approved);
    }
}
