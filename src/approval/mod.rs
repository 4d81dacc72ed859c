//! Remote approval workflow
//!
//! When a stranger is detected, a request is pushed over the remote channel
//! and the controller waits a bounded window for the operator's decision.
//! The decision slot is the one place where two execution contexts (the
//! detection flow and the externally-driven callback) touch shared mutable
//! state; its contract is exactly-once consumption with late deliveries
//! silently discarded.

pub mod channel;
pub mod decision;
pub mod slot;

pub use channel::ApprovalChannel;
pub use decision::ApprovalDecision;
pub use slot::{DecisionHandle, DecisionSlot, ResolveOutcome};
