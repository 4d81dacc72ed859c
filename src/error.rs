//! Crate error types
//!
//! A single error enum covers the capability boundaries (capture, matching,
//! actuation, approval transport) plus I/O. Only startup-time failures are
//! meant to propagate out of the library; everything raised on the
//! recognition path is logged and absorbed by the caller.

use std::fmt;
use std::io;

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for access-controller operations
#[derive(Debug)]
pub enum Error {
    /// Underlying I/O failure (sockets, snapshot persistence)
    Io(io::Error),
    /// The capture device could not produce a frame this cycle (transient)
    Capture(String),
    /// Identity matcher failure (locate or describe)
    Matcher(String),
    /// Actuator command failure
    Actuator(String),
    /// Approval channel transport failure
    Approval(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Capture(msg) => write!(f, "Capture failed: {}", msg),
            Error::Matcher(msg) => write!(f, "Identity matcher failed: {}", msg),
            Error::Actuator(msg) => write!(f, "Actuator command failed: {}", msg),
            Error::Approval(msg) => write!(f, "Approval channel failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
