//! Bounded "wait for motion complete" polling.
//!
//! Tacho motors give no completion interrupt, so a position move is followed
//! by polling the running status at a fixed interval.  The poll is bounded by
//! an optional deadline and any driver fault during the wait is returned
//! instead of being swallowed.

use std::thread;
use std::time::{Duration, Instant};

use armctl_types::config::MotionConfig;
use armctl_types::{ArmError, RunMode};
use tracing::trace;

use crate::motor::Motor;

/// Target of a position move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    /// Move to an encoder position.
    Absolute(i32),
    /// Move by an offset from the current position.
    Relative(i32),
}

/// Timing of a position move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionPolling {
    /// Pause between issuing the move and the first status poll, so the driver
    /// has reported the move as running.
    pub settle: Duration,
    pub poll_interval: Duration,
    pub deadline: Option<Duration>,
}

impl From<&MotionConfig> for MotionPolling {
    fn from(cfg: &MotionConfig) -> Self {
        Self {
            settle: cfg.settle(),
            poll_interval: cfg.poll_interval(),
            deadline: Some(cfg.timeout()),
        }
    }
}

/// Poll `motor` every `poll_interval` until it stops running.
///
/// # Errors
///
/// - [`ArmError::MotionTimeout`] when `deadline` elapses with the motor still
///   running.
/// - Any fault returned by the driver while polling.
pub fn await_motion_complete(
    motor: &mut dyn Motor,
    poll_interval: Duration,
    deadline: Option<Duration>,
) -> Result<(), ArmError> {
    let started = Instant::now();
    let mut polls: u32 = 0;
    while motor.is_running()? {
        polls += 1;
        if let Some(limit) = deadline
            && started.elapsed() >= limit
        {
            return Err(ArmError::MotionTimeout {
                component: motor.id().to_string(),
                waited_ms: limit.as_millis() as u64,
            });
        }
        thread::sleep(poll_interval);
    }
    trace!(motor = motor.id(), polls, "motion complete");
    Ok(())
}

/// Issue a position move and block until it completes.
pub fn move_to(
    motor: &mut dyn Motor,
    target: MoveTarget,
    polling: &MotionPolling,
) -> Result<(), ArmError> {
    let (ticks, mode) = match target {
        MoveTarget::Absolute(ticks) => (ticks, RunMode::AbsolutePosition),
        MoveTarget::Relative(ticks) => (ticks, RunMode::RelativePosition),
    };
    motor.set_target_position(ticks)?;
    motor.run(mode)?;
    thread::sleep(polling.settle);
    await_motion_complete(motor, polling.poll_interval, polling.deadline)
}
