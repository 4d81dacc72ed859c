//! Fixed actuation sequences

use std::time::Duration;

use crate::config::SystemConfig;
use crate::error::Result;

use super::Actuator;

/// Drives the door and alarm through their fixed sequences
///
/// Each sequence blocks its caller for the full hold duration. That is the
/// intended serialization: the caller transitioned the system state before
/// invoking it, so nothing else can start an actuation meanwhile.
#[derive(Debug)]
pub struct Sequencer<A> {
    actuator: A,
    open_angle: f32,
    closed_angle: f32,
    door_hold: Duration,
    alarm_hold: Duration,
}

impl<A: Actuator> Sequencer<A> {
    /// Create a sequencer over an actuator with the configured angles/holds
    pub fn new(actuator: A, config: &SystemConfig) -> Self {
        Self {
            actuator,
            open_angle: config.open_angle,
            closed_angle: config.closed_angle,
            door_hold: config.door_hold,
            alarm_hold: config.alarm_hold,
        }
    }

    /// Drive the lock to the closed position
    ///
    /// Used once at startup so the door is in a known state before the
    /// recognition loop begins.
    pub fn lock(&self) -> Result<()> {
        self.actuator.set_lock_angle(self.closed_angle)
    }

    /// Open the door, hold, and re-lock
    pub async fn open_door(&self) -> Result<()> {
        tracing::info!(angle = self.open_angle, "opening door");
        self.actuator.set_lock_angle(self.open_angle)?;

        tokio::time::sleep(self.door_hold).await;

        tracing::info!(angle = self.closed_angle, "re-locking door");
        self.actuator.set_lock_angle(self.closed_angle)?;
        Ok(())
    }

    /// Sound the alarm for its fixed hold, then silence it
    pub async fn sound_alarm(&self) -> Result<()> {
        tracing::info!(hold_secs = self.alarm_hold.as_secs(), "alarm on");
        self.actuator.alarm_on()?;

        tokio::time::sleep(self.alarm_hold).await;

        self.actuator.alarm_off()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::Error;

    #[derive(Debug, Clone, PartialEq)]
    enum Command {
        Angle(f32),
        AlarmOn,
        AlarmOff,
    }

    /// Records every command; optionally fails all of them
    #[derive(Default)]
    struct RecordingActuator {
        commands: Arc<Mutex<Vec<Command>>>,
        fail: bool,
    }

    impl RecordingActuator {
        fn new() -> Self {
            Self::default()
        }
    }

    impl Actuator for RecordingActuator {
        fn set_lock_angle(&self, angle: f32) -> Result<()> {
            if self.fail {
                return Err(Error::Actuator("servo offline".into()));
            }
            self.commands.lock().unwrap().push(Command::Angle(angle));
            Ok(())
        }

        fn alarm_on(&self) -> Result<()> {
            if self.fail {
                return Err(Error::Actuator("buzzer offline".into()));
            }
            self.commands.lock().unwrap().push(Command::AlarmOn);
            Ok(())
        }

        fn alarm_off(&self) -> Result<()> {
            self.commands.lock().unwrap().push(Command::AlarmOff);
            Ok(())
        }
    }

    fn test_config() -> SystemConfig {
        SystemConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_door_sequence_order_and_hold() {
        let actuator = RecordingActuator::new();
        let commands = Arc::clone(&actuator.commands);
        let sequencer = Sequencer::new(actuator, &test_config());

        let before = tokio::time::Instant::now();
        sequencer.open_door().await.unwrap();

        assert_eq!(
            commands.lock().unwrap().as_slice(),
            &[
                Command::Angle(crate::config::DEFAULT_OPEN_ANGLE),
                Command::Angle(crate::config::DEFAULT_CLOSED_ANGLE)
            ]
        );
        // The full hold elapses before control returns
        assert!(before.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_alarm_sequence_order_and_hold() {
        let actuator = RecordingActuator::new();
        let commands = Arc::clone(&actuator.commands);
        let sequencer = Sequencer::new(actuator, &test_config());

        let before = tokio::time::Instant::now();
        sequencer.sound_alarm().await.unwrap();

        assert_eq!(
            commands.lock().unwrap().as_slice(),
            &[Command::AlarmOn, Command::AlarmOff]
        );
        assert!(before.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_door_failure_propagates() {
        let actuator = RecordingActuator {
            fail: true,
            ..RecordingActuator::new()
        };
        let sequencer = Sequencer::new(actuator, &test_config());

        assert!(sequencer.open_door().await.is_err());
    }

    #[test]
    fn test_lock_drives_closed_angle() {
        let actuator = RecordingActuator::new();
        let commands = Arc::clone(&actuator.commands);
        let sequencer = Sequencer::new(actuator, &test_config());

        sequencer.lock().unwrap();

        assert_eq!(
            commands.lock().unwrap().as_slice(),
            &[Command::Angle(crate::config::DEFAULT_CLOSED_ANGLE)]
        );
    }
}
