//! Generic `Motor` trait for the arm's tacho motors.
//!
//! Each actuator task owns exactly one motor.  The trait mirrors the command
//! set of a position-capable DC motor driver: a duty-cycle setter for direct
//! drive, position set-points with a run command, and status queries.  The
//! driver is the authority on position and motion state; callers never cache
//! either beyond a single read.

use armctl_types::{ArmError, MotorState, RunMode, StopMode};

/// A tacho motor with encoder feedback.
///
/// # Errors
///
/// Every command and query returns [`ArmError::CapabilityFault`] when the
/// driver cannot be reached or rejects the request.  Callers propagate these
/// faults; the control core never retries a motor command.
pub trait Motor: Send {
    /// Stable identifier for this motor, e.g. `"rotation"`.
    fn id(&self) -> &str;

    /// Top speed in encoder ticks per second.
    fn max_speed(&self) -> i32;

    /// Signed duty cycle in percent.  Takes effect immediately in
    /// [`RunMode::Direct`].
    fn set_power(&mut self, duty: i32) -> Result<(), ArmError>;

    /// Start running in `mode` using the current set-points.
    fn run(&mut self, mode: RunMode) -> Result<(), ArmError>;

    /// Position set-point for the next absolute or relative move.
    fn set_target_position(&mut self, ticks: i32) -> Result<(), ArmError>;

    /// Speed set-point for position moves, in ticks per second.
    fn set_speed(&mut self, ticks_per_sec: i32) -> Result<(), ArmError>;

    fn set_stop_mode(&mut self, mode: StopMode) -> Result<(), ArmError>;

    /// Redefine the current position as `ticks`.
    fn reset_encoder(&mut self, ticks: i32) -> Result<(), ArmError>;

    /// Current encoder position.
    fn position(&mut self) -> Result<i32, ArmError>;

    fn state(&mut self) -> Result<MotorState, ArmError>;

    fn is_running(&mut self) -> Result<bool, ArmError> {
        Ok(self.state()?.running)
    }
}

/// One command issued to a [`Motor`].  Simulated and mock drivers record these
/// so tests can assert on exactly what the control core asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCommand {
    SetPower(i32),
    Run(RunMode),
    SetTarget(i32),
    SetSpeed(i32),
    SetStopMode(StopMode),
    ResetEncoder(i32),
}

/// Speed set-point for `percent` of `max_speed`.
pub fn speed_from_percent(max_speed: i32, percent: i32) -> i32 {
    max_speed * percent / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-process motor used only for tests.
    struct MockMotor {
        id: String,
        position: i32,
        log: Vec<MotorCommand>,
    }

    impl MockMotor {
        fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                position: 0,
                log: Vec::new(),
            }
        }
    }

    impl Motor for MockMotor {
        fn id(&self) -> &str {
            &self.id
        }

        fn max_speed(&self) -> i32 {
            900
        }

        fn set_power(&mut self, duty: i32) -> Result<(), ArmError> {
            self.log.push(MotorCommand::SetPower(duty));
            Ok(())
        }

        fn run(&mut self, mode: RunMode) -> Result<(), ArmError> {
            self.log.push(MotorCommand::Run(mode));
            Ok(())
        }

        fn set_target_position(&mut self, ticks: i32) -> Result<(), ArmError> {
            self.log.push(MotorCommand::SetTarget(ticks));
            Ok(())
        }

        fn set_speed(&mut self, ticks_per_sec: i32) -> Result<(), ArmError> {
            self.log.push(MotorCommand::SetSpeed(ticks_per_sec));
            Ok(())
        }

        fn set_stop_mode(&mut self, mode: StopMode) -> Result<(), ArmError> {
            self.log.push(MotorCommand::SetStopMode(mode));
            Ok(())
        }

        fn reset_encoder(&mut self, ticks: i32) -> Result<(), ArmError> {
            self.log.push(MotorCommand::ResetEncoder(ticks));
            self.position = ticks;
            Ok(())
        }

        fn position(&mut self) -> Result<i32, ArmError> {
            Ok(self.position)
        }

        fn state(&mut self) -> Result<MotorState, ArmError> {
            Ok(MotorState::default())
        }
    }

    #[test]
    fn mock_motor_records_commands() {
        let mut motor = MockMotor::new("rotation");
        assert_eq!(motor.id(), "rotation");

        motor.set_power(30).unwrap();
        motor.run(RunMode::Direct).unwrap();
        assert_eq!(
            motor.log,
            vec![MotorCommand::SetPower(30), MotorCommand::Run(RunMode::Direct)]
        );
    }

    #[test]
    fn default_is_running_reads_state() {
        let mut motor = MockMotor::new("claw");
        assert!(!motor.is_running().unwrap());
    }

    #[test]
    fn reset_encoder_redefines_position() {
        let mut motor = MockMotor::new("elevation");
        motor.reset_encoder(0).unwrap();
        assert_eq!(motor.position().unwrap(), 0);
    }

    #[test]
    fn speed_percent_scales_max_speed() {
        assert_eq!(speed_from_percent(900, 40), 360);
        assert_eq!(speed_from_percent(1200, 40), 480);
        assert_eq!(speed_from_percent(900, 20), 180);
    }
}
