//! System state value and its shared cell

use std::fmt;

use tokio::sync::watch;

/// The single authoritative system state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    /// Watching; detections may start a new action
    Idle,
    /// An actuation sequence is in flight
    Busy,
    /// A stranger request is out, waiting on the operator
    AwaitingApproval,
}

impl SystemState {
    /// Whether the recognition loop may evaluate new detections
    pub fn is_idle(&self) -> bool {
        matches!(self, SystemState::Idle)
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemState::Idle => write!(f, "idle"),
            SystemState::Busy => write!(f, "busy"),
            SystemState::AwaitingApproval => write!(f, "awaiting_approval"),
        }
    }
}

/// Watch-backed cell holding the authoritative state
///
/// Transitions go through `send_replace`, so observers can never see a torn
/// value, and a subscriber receives the full transition sequence.
#[derive(Debug)]
pub(crate) struct StateCell {
    tx: watch::Sender<SystemState>,
}

impl StateCell {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(SystemState::Idle);
        Self { tx }
    }

    pub(crate) fn get(&self) -> SystemState {
        *self.tx.borrow()
    }

    pub(crate) fn set(&self, next: SystemState) {
        let prev = self.tx.send_replace(next);
        if prev != next {
            tracing::info!(from = %prev, to = %next, "state transition");
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SystemState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_idle() {
        assert!(SystemState::Idle.is_idle());
        assert!(!SystemState::Busy.is_idle());
        assert!(!SystemState::AwaitingApproval.is_idle());
    }

    #[test]
    fn test_display() {
        assert_eq!(SystemState::AwaitingApproval.to_string(), "awaiting_approval");
    }

    #[tokio::test]
    async fn test_cell_transitions_visible_to_subscriber() {
        let cell = StateCell::new();
        let mut rx = cell.subscribe();

        assert_eq!(cell.get(), SystemState::Idle);

        cell.set(SystemState::Busy);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), SystemState::Busy);

        cell.set(SystemState::Idle);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), SystemState::Idle);
    }
}
