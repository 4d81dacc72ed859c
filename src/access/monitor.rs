//! Recognition loop
//!
//! Consumes frames from the shared buffer, runs identity matching every Nth
//! frame while the system is idle, and dispatches to the controller. The
//! loop awaits each handler, so capture keeps running in its own task while
//! an action is in flight but no second action can start.
//!
//! Debounce: one trigger per continuous same-class detection streak. A
//! frame with no face resets both streak flags, so the same person walking
//! away and coming back triggers again.

use std::sync::Arc;

use crate::actuator::Actuator;
use crate::approval::ApprovalChannel;
use crate::recognize::{IdentityDescriptor, IdentityMatcher};
use crate::stats::SystemStats;
use crate::video::{FrameReader, VideoFrame};

use super::controller::StateController;

/// The continuous detection/dispatch loop
pub struct RecognitionLoop<M, A, C> {
    matcher: M,
    controller: StateController<A, C>,
    frames: FrameReader,
    authorized: IdentityDescriptor,
    skip_factor: u32,
    skip_counter: u32,
    owner_streak: bool,
    stranger_streak: bool,
    stats: Arc<SystemStats>,
}

impl<M, A, C> RecognitionLoop<M, A, C>
where
    M: IdentityMatcher,
    A: Actuator,
    C: ApprovalChannel,
{
    pub(crate) fn new(
        matcher: M,
        controller: StateController<A, C>,
        frames: FrameReader,
        authorized: IdentityDescriptor,
        skip_factor: u32,
        stats: Arc<SystemStats>,
    ) -> Self {
        Self {
            matcher,
            controller,
            frames,
            authorized,
            skip_factor: skip_factor.max(1),
            skip_counter: 0,
            owner_streak: false,
            stranger_streak: false,
            stats,
        }
    }

    /// Run until the frame buffer is dropped
    pub async fn run(mut self) {
        tracing::info!(skip_factor = self.skip_factor, "recognition loop running");

        while let Some(frame) = self.frames.next().await {
            self.observe(frame).await;
        }

        tracing::info!("frame buffer closed; recognition loop exiting");
    }

    /// Evaluate one observed frame
    pub(crate) async fn observe(&mut self, frame: VideoFrame) {
        // Matching is expensive; only every Nth frame gets it
        self.skip_counter += 1;
        if self.skip_counter < self.skip_factor {
            return;
        }
        self.skip_counter = 0;

        // Non-idle means an action is already in flight
        if !self.controller.state().is_idle() {
            return;
        }

        self.stats.record_frame_evaluated();

        let regions = match self.matcher.locate_faces(&frame) {
            Ok(regions) => regions,
            Err(e) => {
                tracing::warn!(error = %e, seq = frame.seq, "face location failed");
                return;
            }
        };

        if regions.is_empty() {
            self.owner_streak = false;
            self.stranger_streak = false;
            return;
        }

        for region in &regions {
            let descriptor = match self.matcher.describe(&frame, region) {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    tracing::warn!(error = %e, seq = frame.seq, "face description failed");
                    continue;
                }
            };

            if self.matcher.compare(&descriptor, &self.authorized) {
                if !self.owner_streak {
                    tracing::info!(seq = frame.seq, "authorized identity at the door");
                    self.controller.handle_owner_detected().await;
                    self.owner_streak = true;
                    self.stranger_streak = false;
                }
            } else if !self.stranger_streak {
                tracing::info!(seq = frame.seq, "unrecognized identity at the door");
                self.controller.handle_stranger_detected(&frame).await;
                self.stranger_streak = true;
                self.owner_streak = false;
            }
        }
    }
}
