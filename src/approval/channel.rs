//! Remote approval channel capability

use std::future::Future;

use crate::error::Result;
use crate::video::VideoFrame;

use super::decision::ApprovalDecision;

/// Outbound side of the remote approval transport
///
/// The inbound side is decoupled: the embedder's transport (bot callback,
/// webhook, whatever) delivers the operator's choice through a
/// [`DecisionHandle`](super::DecisionHandle) from its own task. Only one
/// request is ever outstanding, so no request identity is carried here.
pub trait ApprovalChannel: Send + Sync + 'static {
    /// Push an approval request carrying the captured snapshot
    ///
    /// A transport failure is logged by the controller and not retried; the
    /// bounded wait still runs, so silence escalates through the timeout
    /// path as usual.
    fn push_request(&self, snapshot: &VideoFrame) -> impl Future<Output = Result<()>> + Send;

    /// Report a resolved operator decision back over the channel
    ///
    /// Called for operator-driven outcomes only (approved/denied), never for
    /// timeouts. The default does nothing.
    fn acknowledge(&self, decision: ApprovalDecision) -> impl Future<Output = Result<()>> + Send {
        async move {
            let _ = decision;
            Ok(())
        }
    }
}
