//! Identity matching capability
//!
//! Face matching is an external capability: given a frame, locate face
//! regions; given a region, produce a comparable identity descriptor; given
//! two descriptors, decide whether they are the same person. Model choice,
//! thresholds, and enrollment live entirely in the implementation.

pub mod matcher;

pub use matcher::{FaceRegion, IdentityDescriptor, IdentityMatcher};
