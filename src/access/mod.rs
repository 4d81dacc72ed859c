//! The state controller and recognition loop
//!
//! The single authoritative [`SystemState`] lives here, together with the
//! only code allowed to command actuation.
//!
//! # State machine
//!
//! ```text
//!            owner match
//!    Idle ─────────────────────► Busy
//!     ▲ │                        ▲  │
//!     │ │ stranger match         │  │ sequence done
//!     │ ▼              approved  │  ▼
//!     │ AwaitingApproval ────────┘ Idle
//!     │        │
//!     └────────┘ denied / timed out (alarm on timeout)
//! ```
//!
//! The recognition loop is the only writer of the state and blocks on each
//! handler, so no second action can start while one is in flight. Raw frame
//! capture runs in its own task and keeps feeding the stream while the loop
//! is blocked.

pub mod controller;
pub mod monitor;
pub mod state;

pub use controller::StateController;
pub use monitor::RecognitionLoop;
pub use state::SystemState;
