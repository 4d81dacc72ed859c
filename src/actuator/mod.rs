//! Lock and alarm actuation
//!
//! The hardware itself is a capability; this module owns the fixed
//! open → hold → close and on → hold → off sequences. Sequences are never
//! interrupted and only one is ever in flight system-wide, serialized by
//! the system state rather than by locking the hardware.

pub mod sequence;

pub use sequence::Sequencer;

use crate::error::Result;

/// Physical actuator capability: the lock servo and the local alarm
///
/// Commands take `&self`; hardware handles are expected to manage their own
/// interior synchronization, and the state machine guarantees a single
/// caller anyway.
pub trait Actuator: Send + Sync + 'static {
    /// Drive the lock servo to an angle in degrees
    fn set_lock_angle(&self, angle: f32) -> Result<()>;

    /// Switch the alarm on
    fn alarm_on(&self) -> Result<()>;

    /// Switch the alarm off
    fn alarm_off(&self) -> Result<()>;
}
