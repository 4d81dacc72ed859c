//! Door controller demo with stubbed hardware
//!
//! Run with: cargo run --example door_demo [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example door_demo                  # streams on 0.0.0.0:5000
//!   cargo run --example door_demo 127.0.0.1:5001
//!
//! Watch the live stream:
//!   ffplay http://localhost:5000/stream
//!   vlc http://localhost:5000/stream
//!
//! Everything physical is stubbed: a synthetic camera emits placeholder
//! frames, the scripted matcher periodically "sees" the owner and then a
//! stranger, the actuator logs its commands, and the approval channel
//! auto-approves two seconds after each request. Watch the logs to follow
//! the full state-machine cycle: owner admission, stranger request,
//! approval, timeout and alarm.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use bytes::Bytes;

use facegate::actuator::Actuator;
use facegate::approval::{ApprovalChannel, ApprovalDecision, DecisionHandle};
use facegate::recognize::{FaceRegion, IdentityDescriptor, IdentityMatcher};
use facegate::video::{FrameSource, VideoFrame};
use facegate::{AccessSystem, Result, SystemConfig};

/// Synthetic camera emitting placeholder JPEG payloads
///
/// The payloads are not decodable images; point a real `FrameSource` at a
/// camera for actual video.
struct SyntheticCamera {
    seq: u64,
}

impl FrameSource for SyntheticCamera {
    async fn capture(&mut self) -> Result<VideoFrame> {
        self.seq += 1;
        let data = if self.seq % 2 == 0 {
            Bytes::from_static(b"\xff\xd8synthetic-even\xff\xd9")
        } else {
            Bytes::from_static(b"\xff\xd8synthetic-odd\xff\xd9")
        };
        Ok(VideoFrame::new(self.seq, data, 320, 240))
    }
}

/// Matcher that scripts a repeating scenario off the frame sequence:
/// empty hallway, then the owner, then empty, then a stranger.
struct ScriptedMatcher;

const OWNER_EMBEDDING: f32 = 1.0;
const STRANGER_EMBEDDING: f32 = 0.0;

impl IdentityMatcher for ScriptedMatcher {
    fn locate_faces(&mut self, frame: &VideoFrame) -> Result<Vec<FaceRegion>> {
        Ok(match frame.seq % 400 {
            100..=149 | 250..=299 => vec![FaceRegion::new(0, 0, 64, 64)],
            _ => vec![],
        })
    }

    fn describe(&mut self, frame: &VideoFrame, _region: &FaceRegion) -> Result<IdentityDescriptor> {
        let embedding = if frame.seq % 400 < 200 {
            OWNER_EMBEDDING
        } else {
            STRANGER_EMBEDDING
        };
        Ok(IdentityDescriptor::new(vec![embedding]))
    }

    fn compare(&self, candidate: &IdentityDescriptor, reference: &IdentityDescriptor) -> bool {
        candidate.as_slice() == reference.as_slice()
    }
}

/// Actuator that only logs what it is told to do
struct ConsoleActuator;

impl Actuator for ConsoleActuator {
    fn set_lock_angle(&self, angle: f32) -> Result<()> {
        println!("[actuator] lock angle -> {:.0} degrees", angle);
        Ok(())
    }

    fn alarm_on(&self) -> Result<()> {
        println!("[actuator] ALARM ON");
        Ok(())
    }

    fn alarm_off(&self) -> Result<()> {
        println!("[actuator] alarm off");
        Ok(())
    }
}

/// Approval channel that approves every other request after two seconds
/// and lets the rest time out, so both workflow outcomes show up in logs
struct AutoApprovalChannel {
    handle: Arc<OnceLock<DecisionHandle>>,
    requests: std::sync::atomic::AtomicU64,
}

impl ApprovalChannel for AutoApprovalChannel {
    async fn push_request(&self, snapshot: &VideoFrame) -> Result<()> {
        let n = self
            .requests
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        println!(
            "[channel] approval request #{} pushed ({} byte snapshot)",
            n + 1,
            snapshot.size()
        );

        if n % 2 == 0 {
            if let Some(handle) = self.handle.get().cloned() {
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    println!("[channel] operator tapped approve");
                    handle.resolve(ApprovalDecision::Approved).await;
                });
            }
        } else {
            println!("[channel] operator is asleep; this one will time out");
        }

        Ok(())
    }

    async fn acknowledge(&self, decision: ApprovalDecision) -> Result<()> {
        println!("[channel] operator notified: {}", decision);
        Ok(())
    }
}

fn parse_bind_addr(arg: &str) -> std::result::Result<SocketAddr, String> {
    arg.replace("localhost", "127.0.0.1")
        .parse()
        .map_err(|_| format!("Invalid bind address: '{}'. Expected IP:PORT", arg))
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("facegate=debug".parse()?),
        )
        .init();

    let bind_addr = match std::env::args().nth(1) {
        Some(arg) => match parse_bind_addr(&arg) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => "0.0.0.0:5000".parse()?,
    };

    let config = SystemConfig::default()
        .bind(bind_addr)
        .snapshot_dir(std::env::temp_dir().join("facegate-demo-strangers"));

    println!("Starting door controller demo");
    println!("Live stream: http://{}/stream", config.bind_addr);
    println!("Stranger snapshots: {}", config.snapshot_dir.display());
    println!();

    let handle_cell = Arc::new(OnceLock::new());
    let channel = AutoApprovalChannel {
        handle: Arc::clone(&handle_cell),
        requests: std::sync::atomic::AtomicU64::new(0),
    };

    let system = AccessSystem::new(
        config,
        SyntheticCamera { seq: 0 },
        ScriptedMatcher,
        ConsoleActuator,
        channel,
        IdentityDescriptor::new(vec![OWNER_EMBEDDING]),
    )?;

    // The channel delivers decisions through this handle from its own task
    let _ = handle_cell.set(system.decision_handle());

    tokio::select! {
        result = system.run() => {
            if let Err(e) = result {
                eprintln!("System error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
    }

    Ok(())
}
