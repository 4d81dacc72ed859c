//! # facegate
//!
//! An unattended door access controller: a camera watches the entry point,
//! an identity matcher recognizes the authorized party, and the lock opens
//! for them. Anyone else triggers a remote approval request with a bounded
//! wait; silence escalates to the local alarm. A live MJPEG view of the
//! camera is served concurrently with recognition.
//!
//! The hardware and algorithms are capabilities the embedder supplies:
//!
//! - [`video::FrameSource`]: the camera
//! - [`recognize::IdentityMatcher`]: face location and comparison
//! - [`actuator::Actuator`]: the lock servo and alarm
//! - [`approval::ApprovalChannel`]: the remote operator transport
//!
//! What this crate owns is the coordination between them: the single
//! authoritative system state, a recognition loop that never starts a
//! second action while one is in flight, the approval-versus-deadline race
//! with its exactly-once decision slot, and the latest-frame buffer shared
//! between capture and any number of stream viewers.
//!
//! ```text
//!  camera ──► capture task ──► FrameBuffer ──► StreamPublisher ──► viewers
//!                                  │
//!                                  ▼
//!                          RecognitionLoop ──► StateController ──► lock/alarm
//!                                                   │  ▲
//!                                                   ▼  │ DecisionHandle
//!                                            ApprovalChannel ◄── operator
//! ```

pub mod access;
pub mod actuator;
pub mod approval;
pub mod config;
pub mod error;
pub mod recognize;
pub mod snapshot;
pub mod stats;
pub mod stream;
pub mod system;
pub mod video;

pub use access::SystemState;
pub use approval::{ApprovalDecision, DecisionHandle};
pub use config::SystemConfig;
pub use error::{Error, Result};
pub use system::AccessSystem;
