//! Claw controller: toggles the grip on each consumed press.
//!
//! Closing drives the claw in direct mode for a fixed dwell and then cuts
//! power, so the jaws settle on whatever they are holding instead of
//! targeting a fixed position.  Opening is a position move back to zero.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use armctl_hal::{MotionPolling, Motor, MoveTarget, move_to, speed_from_percent};
use armctl_kernel::{SharedControlState, run_periodic};
use armctl_types::config::ClawConfig;
use armctl_types::{ArmError, ClawIntent, RunMode};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClawPosition {
    Open,
    Closed,
}

pub struct ClawController {
    motor: Box<dyn Motor>,
    config: ClawConfig,
    polling: MotionPolling,
    state: Arc<SharedControlState>,
    position: ClawPosition,
}

impl ClawController {
    /// A controller for a claw that calibration has just left open.
    pub fn new(
        motor: Box<dyn Motor>,
        config: ClawConfig,
        polling: MotionPolling,
        state: Arc<SharedControlState>,
    ) -> Self {
        Self {
            motor,
            config,
            polling,
            state,
            position: ClawPosition::Open,
        }
    }

    /// Consume a pending press, if any, and toggle.
    ///
    /// Returns the position after this cycle.
    pub fn step(&mut self) -> Result<ClawPosition, ArmError> {
        if self.state.take_claw_intent() == ClawIntent::Active {
            match self.position {
                ClawPosition::Open => self.close()?,
                ClawPosition::Closed => self.open()?,
            }
        }
        Ok(self.position)
    }

    fn close(&mut self) -> Result<(), ArmError> {
        self.motor.set_power(self.config.close_power)?;
        self.motor.run(RunMode::Direct)?;
        thread::sleep(self.config.close_dwell());
        self.motor.set_power(0)?;
        self.position = ClawPosition::Closed;
        self.state.set_claw_used(true);
        info!("claw closed");
        Ok(())
    }

    fn open(&mut self) -> Result<(), ArmError> {
        let speed = speed_from_percent(self.motor.max_speed(), self.config.homing.speed_percent);
        self.motor.set_speed(speed)?;
        move_to(self.motor.as_mut(), MoveTarget::Absolute(0), &self.polling)?;
        self.motor.set_power(0)?;
        self.position = ClawPosition::Open;
        self.state.set_claw_used(false);
        info!("claw opened");
        Ok(())
    }

    pub fn run(mut self, period: Duration) -> Result<Box<dyn Motor>, ArmError> {
        let state = self.state.clone();
        run_periodic("claw", period, &state, || self.step().map(|_| ()))?;
        Ok(self.motor)
    }
}
