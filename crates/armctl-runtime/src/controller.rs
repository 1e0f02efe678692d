//! Axis controller: the per-cycle state machine shared by rotation and
//! elevation.
//!
//! Each cycle evaluates, in order:
//!
//! 1. the axis' limit flag is raised → back off by `correction_ticks`, then
//!    clear the flag;
//! 2. the position has crossed the unsensed travel bound → return to zero;
//! 3. the operator intent differs from the direction last applied → apply
//!    the new duty cycle;
//! 4. otherwise do nothing.
//!
//! A correction runs to completion inside one cycle, so it always pre-empts
//! operator intents and at most one is ever in flight per axis.  After a
//! correction the motor is stopped and the applied direction is `Halt`, so a
//! still-held button resumes motion on the next cycle.

use std::sync::Arc;
use std::time::Duration;

use armctl_hal::{MotionPolling, Motor, MoveTarget, move_to, speed_from_percent};
use armctl_kernel::{SharedControlState, run_periodic};
use armctl_types::config::AxisConfig;
use armctl_types::{ArmError, Axis, AxisCommand, LimitKind, RunMode, TravelBound};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Running(AxisCommand),
    Correcting,
}

/// Why a correction was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionCause {
    Limit(LimitKind),
    Bound(TravelBound),
}

/// What one controller cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Corrected(CorrectionCause),
    Applied(AxisCommand),
    Unchanged,
}

pub struct AxisController {
    axis: Axis,
    motor: Box<dyn Motor>,
    config: AxisConfig,
    polling: MotionPolling,
    state: Arc<SharedControlState>,
    applied: AxisCommand,
    phase: ControllerState,
}

impl AxisController {
    pub fn new(
        axis: Axis,
        motor: Box<dyn Motor>,
        config: AxisConfig,
        polling: MotionPolling,
        state: Arc<SharedControlState>,
    ) -> Self {
        Self {
            axis,
            motor,
            config,
            polling,
            state,
            applied: AxisCommand::Halt,
            phase: ControllerState::Idle,
        }
    }

    pub fn phase(&self) -> ControllerState {
        self.phase
    }

    /// Direction most recently applied to the motor.
    pub fn applied(&self) -> AxisCommand {
        self.applied
    }

    pub fn step(&mut self) -> Result<StepOutcome, ArmError> {
        let limit = self.axis.limit();
        if self.state.limit(limit) {
            self.correct(MoveTarget::Relative(self.config.correction_ticks))?;
            self.state.clear_limit(limit);
            return Ok(StepOutcome::Corrected(CorrectionCause::Limit(limit)));
        }

        let position = self.motor.position()?;
        if self.config.bound.is_exceeded(position) {
            self.correct(MoveTarget::Absolute(0))?;
            return Ok(StepOutcome::Corrected(CorrectionCause::Bound(
                self.config.bound,
            )));
        }

        let wanted = self.state.intents().command_for(self.axis);
        if wanted == self.applied {
            return Ok(StepOutcome::Unchanged);
        }
        self.motor.set_power(self.power_for(wanted))?;
        self.motor.run(RunMode::Direct)?;
        debug!(axis = self.axis.actuator().name(), ?wanted, "direction applied");
        self.applied = wanted;
        self.phase = match wanted {
            AxisCommand::Halt => ControllerState::Idle,
            moving => ControllerState::Running(moving),
        };
        Ok(StepOutcome::Applied(wanted))
    }

    fn power_for(&self, command: AxisCommand) -> i32 {
        match command {
            AxisCommand::Forward => self.config.forward_power,
            AxisCommand::Reverse => self.config.reverse_power,
            AxisCommand::Halt => 0,
        }
    }

    fn correct(&mut self, target: MoveTarget) -> Result<(), ArmError> {
        warn!(axis = self.axis.actuator().name(), ?target, "correcting");
        let _correcting = self.state.begin_correction();
        self.phase = ControllerState::Correcting;

        let speed = speed_from_percent(self.motor.max_speed(), self.config.homing.speed_percent);
        self.motor.set_speed(speed)?;
        move_to(self.motor.as_mut(), target, &self.polling)?;

        self.motor.set_power(0)?;
        self.motor.run(RunMode::Direct)?;
        self.applied = AxisCommand::Halt;
        self.phase = ControllerState::Idle;
        Ok(())
    }

    /// Run every `period` until shutdown, then hand the motor back for
    /// parking.
    pub fn run(mut self, period: Duration) -> Result<Box<dyn Motor>, ArmError> {
        let state = self.state.clone();
        run_periodic(self.axis.actuator().name(), period, &state, || {
            self.step().map(|_| ())
        })?;
        Ok(self.motor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armctl_hal::MotorCommand;
    use armctl_types::config::MotionConfig;
    use armctl_types::{ElevationIntent, MotorState, RotationIntent, StopMode};
    use std::sync::Mutex;

    /// Records commands and snapshots the correction flag when a position
    /// move starts.  Position moves finish instantly.
    struct MockMotor {
        log: Arc<Mutex<Vec<MotorCommand>>>,
        position: i32,
        state: Arc<SharedControlState>,
        correcting_during_move: Arc<Mutex<Vec<bool>>>,
    }

    impl Motor for MockMotor {
        fn id(&self) -> &str {
            "mock"
        }
        fn max_speed(&self) -> i32 {
            900
        }
        fn set_power(&mut self, duty: i32) -> Result<(), ArmError> {
            self.log.lock().unwrap().push(MotorCommand::SetPower(duty));
            Ok(())
        }
        fn run(&mut self, mode: RunMode) -> Result<(), ArmError> {
            if mode != RunMode::Direct {
                self.correcting_during_move
                    .lock()
                    .unwrap()
                    .push(self.state.correction_in_progress());
                self.position = 0;
            }
            self.log.lock().unwrap().push(MotorCommand::Run(mode));
            Ok(())
        }
        fn set_target_position(&mut self, ticks: i32) -> Result<(), ArmError> {
            self.log.lock().unwrap().push(MotorCommand::SetTarget(ticks));
            Ok(())
        }
        fn set_speed(&mut self, ticks_per_sec: i32) -> Result<(), ArmError> {
            self.log.lock().unwrap().push(MotorCommand::SetSpeed(ticks_per_sec));
            Ok(())
        }
        fn set_stop_mode(&mut self, mode: StopMode) -> Result<(), ArmError> {
            self.log.lock().unwrap().push(MotorCommand::SetStopMode(mode));
            Ok(())
        }
        fn reset_encoder(&mut self, ticks: i32) -> Result<(), ArmError> {
            self.log.lock().unwrap().push(MotorCommand::ResetEncoder(ticks));
            Ok(())
        }
        fn position(&mut self) -> Result<i32, ArmError> {
            Ok(self.position)
        }
        fn state(&mut self) -> Result<MotorState, ArmError> {
            Ok(MotorState::default())
        }
    }

    struct Rig {
        controller: AxisController,
        log: Arc<Mutex<Vec<MotorCommand>>>,
        correcting: Arc<Mutex<Vec<bool>>>,
        state: Arc<SharedControlState>,
    }

    impl Rig {
        fn new(axis: Axis, position: i32) -> Self {
            let state = Arc::new(SharedControlState::new());
            let log = Arc::new(Mutex::new(Vec::new()));
            let correcting = Arc::new(Mutex::new(Vec::new()));
            let motor = MockMotor {
                log: log.clone(),
                position,
                state: state.clone(),
                correcting_during_move: correcting.clone(),
            };
            let config = match axis {
                Axis::Rotation => AxisConfig::rotation(),
                Axis::Elevation => AxisConfig::elevation(),
            };
            let polling = MotionPolling {
                deadline: Some(Duration::from_secs(1)),
                ..MotionPolling::from(&MotionConfig::default())
            };
            let controller =
                AxisController::new(axis, Box::new(motor), config, polling, state.clone());
            Self {
                controller,
                log,
                correcting,
                state,
            }
        }

        fn powers(&self) -> Vec<i32> {
            self.log
                .lock()
                .unwrap()
                .iter()
                .filter_map(|c| match c {
                    MotorCommand::SetPower(p) => Some(*p),
                    _ => None,
                })
                .collect()
        }

        fn commands(&self) -> Vec<MotorCommand> {
            self.log.lock().unwrap().clone()
        }
    }

    #[test]
    fn rotation_intents_issue_three_power_commands() {
        let mut rig = Rig::new(Axis::Rotation, 0);
        for intent in [
            RotationIntent::Right,
            RotationIntent::Right,
            RotationIntent::Stop,
            RotationIntent::Left,
        ] {
            rig.state.set_rotation_intent(intent);
            rig.controller.step().unwrap();
        }
        assert_eq!(rig.powers(), vec![30, 0, -30]);
        assert_eq!(
            rig.controller.phase(),
            ControllerState::Running(AxisCommand::Reverse)
        );
    }

    #[test]
    fn repeated_intent_is_a_no_op() {
        let mut rig = Rig::new(Axis::Elevation, 0);
        rig.state.set_elevation_intent(ElevationIntent::Rise);
        assert_eq!(
            rig.controller.step().unwrap(),
            StepOutcome::Applied(AxisCommand::Forward)
        );
        assert_eq!(rig.controller.step().unwrap(), StepOutcome::Unchanged);
        assert_eq!(rig.powers(), vec![-30]);
    }

    #[test]
    fn limit_correction_preempts_intent() {
        let mut rig = Rig::new(Axis::Rotation, 0);
        rig.state.set_rotation_intent(RotationIntent::Right);
        rig.state.raise_limit(LimitKind::Clockwise);

        let outcome = rig.controller.step().unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Corrected(CorrectionCause::Limit(LimitKind::Clockwise))
        );
        assert_eq!(
            rig.commands(),
            vec![
                MotorCommand::SetSpeed(360),
                MotorCommand::SetTarget(-350),
                MotorCommand::Run(RunMode::RelativePosition),
                MotorCommand::SetPower(0),
                MotorCommand::Run(RunMode::Direct),
            ]
        );
        assert_eq!(*rig.correcting.lock().unwrap(), vec![true]);
        assert!(!rig.state.correction_in_progress());
        assert!(!rig.state.limit(LimitKind::Clockwise));
        assert_eq!(rig.controller.applied(), AxisCommand::Halt);

        // The held intent resumes on the following cycle.
        assert_eq!(
            rig.controller.step().unwrap(),
            StepOutcome::Applied(AxisCommand::Forward)
        );
        assert_eq!(rig.powers(), vec![0, 30]);
    }

    #[test]
    fn elevation_backs_off_downward() {
        let mut rig = Rig::new(Axis::Elevation, 0);
        rig.state.raise_limit(LimitKind::Top);
        rig.controller.step().unwrap();
        assert!(rig.commands().contains(&MotorCommand::SetTarget(100)));
        assert!(!rig.state.limit(LimitKind::Top));
    }

    #[test]
    fn controller_leaves_other_limit_alone() {
        let mut rig = Rig::new(Axis::Rotation, 0);
        rig.state.raise_limit(LimitKind::Top);
        assert_eq!(rig.controller.step().unwrap(), StepOutcome::Unchanged);
        assert!(rig.state.limit(LimitKind::Top));
    }

    #[test]
    fn crossing_bound_returns_to_zero() {
        let mut rig = Rig::new(Axis::Rotation, -401);
        rig.state.set_rotation_intent(RotationIntent::Left);
        let outcome = rig.controller.step().unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Corrected(CorrectionCause::Bound(TravelBound::Below(-400)))
        );
        assert!(rig.commands().contains(&MotorCommand::SetTarget(0)));
        assert!(rig.commands().contains(&MotorCommand::Run(RunMode::AbsolutePosition)));
        assert_eq!(rig.powers(), vec![0]);
    }

    #[test]
    fn bound_is_strict() {
        let mut rig = Rig::new(Axis::Elevation, 200);
        assert_eq!(rig.controller.step().unwrap(), StepOutcome::Unchanged);
        assert!(rig.commands().is_empty());
    }

    #[test]
    fn shutdown_stops_run_and_returns_motor() {
        let Rig {
            controller, log, state, ..
        } = Rig::new(Axis::Rotation, 0);
        state.set_rotation_intent(RotationIntent::Right);
        let stopper = {
            let state = state.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                state.request_shutdown();
            })
        };
        let motor = controller.run(Duration::from_millis(2)).unwrap();
        stopper.join().unwrap();
        assert_eq!(motor.id(), "mock");
        assert_eq!(*log.lock().unwrap(), vec![
            MotorCommand::SetPower(30),
            MotorCommand::Run(RunMode::Direct)
        ]);
    }

    /// Takes `polls` status reads to finish a position move and requests
    /// shutdown halfway through.
    struct SlowMotor {
        log: Arc<Mutex<Vec<MotorCommand>>>,
        state: Arc<SharedControlState>,
        polls: u32,
        polls_seen: Arc<Mutex<u32>>,
        moving: bool,
    }

    impl Motor for SlowMotor {
        fn id(&self) -> &str {
            "slow"
        }
        fn max_speed(&self) -> i32 {
            900
        }
        fn set_power(&mut self, duty: i32) -> Result<(), ArmError> {
            self.log.lock().unwrap().push(MotorCommand::SetPower(duty));
            Ok(())
        }
        fn run(&mut self, mode: RunMode) -> Result<(), ArmError> {
            self.moving = mode == RunMode::RelativePosition;
            self.log.lock().unwrap().push(MotorCommand::Run(mode));
            Ok(())
        }
        fn set_target_position(&mut self, ticks: i32) -> Result<(), ArmError> {
            self.log.lock().unwrap().push(MotorCommand::SetTarget(ticks));
            Ok(())
        }
        fn set_speed(&mut self, _ticks_per_sec: i32) -> Result<(), ArmError> {
            Ok(())
        }
        fn set_stop_mode(&mut self, _mode: StopMode) -> Result<(), ArmError> {
            Ok(())
        }
        fn reset_encoder(&mut self, _ticks: i32) -> Result<(), ArmError> {
            Ok(())
        }
        fn position(&mut self) -> Result<i32, ArmError> {
            Ok(0)
        }
        fn state(&mut self) -> Result<MotorState, ArmError> {
            if !self.moving {
                return Ok(MotorState::default());
            }
            let mut seen = self.polls_seen.lock().unwrap();
            *seen += 1;
            if *seen == self.polls / 2 {
                self.state.request_shutdown();
            }
            self.moving = *seen < self.polls;
            Ok(MotorState {
                running: self.moving,
                stalled: false,
            })
        }
    }

    #[test]
    fn shutdown_during_correction_waits_for_the_back_off() {
        let state = Arc::new(SharedControlState::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let polls_seen = Arc::new(Mutex::new(0));
        let motor = SlowMotor {
            log: log.clone(),
            state: state.clone(),
            polls: 20,
            polls_seen: polls_seen.clone(),
            moving: false,
        };
        let polling = MotionPolling {
            settle: Duration::ZERO,
            poll_interval: Duration::from_millis(1),
            deadline: Some(Duration::from_secs(1)),
        };
        let controller = AxisController::new(
            Axis::Rotation,
            Box::new(motor),
            AxisConfig::rotation(),
            polling,
            state.clone(),
        );
        state.raise_limit(LimitKind::Clockwise);

        controller.run(Duration::from_millis(2)).unwrap();

        assert!(state.shutdown_requested());
        assert_eq!(*polls_seen.lock().unwrap(), 20);
        assert!(!state.limit(LimitKind::Clockwise));
        assert!(!state.correction_in_progress());
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                MotorCommand::SetTarget(-350),
                MotorCommand::Run(RunMode::RelativePosition),
                MotorCommand::SetPower(0),
                MotorCommand::Run(RunMode::Direct),
            ]
        );
    }
}
