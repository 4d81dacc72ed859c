//! System wiring
//!
//! Builds the controller from the four capabilities and runs the three
//! process-lifetime activities: the capture task, the stream publisher, and
//! the recognition loop. Startup-time failures (snapshot directory, lock
//! reset, stream bind) abort before the loop begins; after that, nothing on
//! the recognition path is allowed to take the process down.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::access::{RecognitionLoop, StateController, SystemState};
use crate::actuator::{Actuator, Sequencer};
use crate::approval::{ApprovalChannel, DecisionHandle};
use crate::config::SystemConfig;
use crate::error::Result;
use crate::recognize::{IdentityDescriptor, IdentityMatcher};
use crate::snapshot::SnapshotStore;
use crate::stats::SystemStats;
use crate::stream::StreamPublisher;
use crate::video::{FrameBuffer, FrameSource};

/// The assembled access controller
///
/// Generic over the four external capabilities: the camera, the face
/// matcher, the lock/alarm hardware, and the remote approval transport.
pub struct AccessSystem<S, M, A, C> {
    config: SystemConfig,
    source: S,
    matcher: M,
    controller: StateController<A, C>,
    authorized: IdentityDescriptor,
    buffer: Arc<FrameBuffer>,
    stats: Arc<SystemStats>,
}

impl<S, M, A, C> AccessSystem<S, M, A, C>
where
    S: FrameSource,
    M: IdentityMatcher,
    A: Actuator,
    C: ApprovalChannel,
{
    /// Assemble the system
    ///
    /// Creates the snapshot directory and drives the lock to its closed
    /// position; either failing is fatal, per the startup policy.
    pub fn new(
        config: SystemConfig,
        source: S,
        matcher: M,
        actuator: A,
        channel: C,
        authorized: IdentityDescriptor,
    ) -> Result<Self> {
        let snapshots = SnapshotStore::open(&config.snapshot_dir)?;

        let sequencer = Sequencer::new(actuator, &config);
        sequencer.lock()?;

        let stats = Arc::new(SystemStats::new());
        let controller =
            StateController::new(&config, sequencer, channel, snapshots, Arc::clone(&stats));

        Ok(Self {
            config,
            source,
            matcher,
            controller,
            authorized,
            buffer: Arc::new(FrameBuffer::new()),
            stats,
        })
    }

    /// Handle for the approval transport to deliver operator decisions
    pub fn decision_handle(&self) -> DecisionHandle {
        self.controller.decision_handle()
    }

    /// The shared frame buffer (for embedders with extra consumers)
    pub fn frame_buffer(&self) -> Arc<FrameBuffer> {
        Arc::clone(&self.buffer)
    }

    /// Live counters
    pub fn stats(&self) -> Arc<SystemStats> {
        Arc::clone(&self.stats)
    }

    /// Subscribe to state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<SystemState> {
        self.controller.subscribe_state()
    }

    /// Run the system
    ///
    /// Binds the stream endpoint, spawns the capture task and the stream
    /// publisher, then drives the recognition loop in the calling task.
    /// Runs for the process lifetime; shutdown is abrupt by design.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "stream publisher listening");

        let publisher = StreamPublisher::new(
            &self.config,
            Arc::clone(&self.buffer),
            Arc::clone(&self.stats),
        );
        tokio::spawn(publisher.serve(listener));

        tokio::spawn(capture_loop(
            self.source,
            Arc::clone(&self.buffer),
            self.config.capture_interval,
            Arc::clone(&self.stats),
        ));

        let monitor = RecognitionLoop::new(
            self.matcher,
            self.controller,
            self.buffer.reader(),
            self.authorized,
            self.config.skip_factor,
            self.stats,
        );
        monitor.run().await;

        Ok(())
    }
}

/// Capture frames at the configured pace and publish them to the buffer
///
/// Runs regardless of system state, so the live view keeps moving while an
/// actuation or approval wait is in flight. A failed capture is skipped and
/// retried on the next tick.
async fn capture_loop<S: FrameSource>(
    mut source: S,
    buffer: Arc<FrameBuffer>,
    interval: Duration,
    stats: Arc<SystemStats>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match source.capture().await {
            Ok(frame) => {
                stats.record_frame_captured();
                buffer.publish(frame);
            }
            Err(e) => {
                stats.record_capture_failure();
                tracing::debug!(error = %e, "no frame this cycle");
            }
        }
    }
}
