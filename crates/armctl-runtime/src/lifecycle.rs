//! Lifecycle coordinator: calibration → steady state → shutdown → park.
//!
//! Every task is its own OS thread, named after the task, running inside an
//! `info_span!("task")` and switched to its real-time priority before its
//! first cycle.  A task that fails (or panics) requests shutdown on its way
//! out so its siblings wind down; the coordinator joins every thread and
//! reports the first fault.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use armctl_hal::{ArmHardware, MotionPolling, Motor, Sensor, await_motion_complete};
use armctl_kernel::{SharedControlState, apply_priority};
use armctl_types::config::{ArmConfig, SchedulingConfig};
use armctl_types::{
    ActuatorKind, ArmError, Axis, HomingPriority, RunMode, SchedulingClass, TaskPriority,
};
use tracing::{error, info, info_span, warn};

use crate::calibration::HomingRig;
use crate::claw::ClawController;
use crate::controller::AxisController;
use crate::indicators::{Reporter, StatusLight};
use crate::input::InputDispatcher;
use crate::sensors::LimitMonitor;

// ────────────────────────────────────────────────────────────────────────────
// Task threads
// ────────────────────────────────────────────────────────────────────────────

/// Requests shutdown if the owning thread unwinds.
struct ShutdownOnPanic(Arc<SharedControlState>);

impl Drop for ShutdownOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.request_shutdown();
        }
    }
}

fn spawn_task<T, C, F>(
    name: &'static str,
    class: C,
    scheduling: &SchedulingConfig,
    state: &Arc<SharedControlState>,
    body: F,
) -> Result<JoinHandle<Result<T, ArmError>>, ArmError>
where
    T: Send + 'static,
    C: SchedulingClass + Send + 'static,
    F: FnOnce() -> Result<T, ArmError> + Send + 'static,
{
    let scheduling = scheduling.clone();
    let state = state.clone();
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            let _unwind = ShutdownOnPanic(state.clone());
            let span = info_span!("task", name);
            let _entered = span.enter();

            let result = apply_priority(class, &scheduling).and_then(|_| body());
            if let Err(err) = &result {
                error!(error = %err, "task failed");
                state.request_shutdown();
            }
            result
        })
        .map_err(|e| ArmError::Scheduling(format!("cannot spawn {name}: {e}")))
}

fn join_task<T>(name: &str, handle: JoinHandle<Result<T, ArmError>>) -> Result<T, ArmError> {
    handle
        .join()
        .map_err(|_| ArmError::TaskPanicked(name.to_string()))?
}

/// Keep the first error seen.
fn first_error(slot: &mut Option<ArmError>, err: ArmError) {
    if slot.is_none() {
        *slot = Some(err);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Calibration
// ────────────────────────────────────────────────────────────────────────────

/// The three homing rigs of one arm.
pub struct HomingRigs {
    pub rotation: HomingRig,
    pub elevation: HomingRig,
    pub claw: HomingRig,
}

impl HomingRigs {
    /// Pair every motor with its reference.
    pub fn from_hardware(
        motors: armctl_hal::ArmMotors,
        touch: Box<dyn Sensor>,
        color: Box<dyn Sensor>,
        config: &ArmConfig,
    ) -> Result<Self, ArmError> {
        Ok(Self {
            rotation: HomingRig::rotation(motors.rotation, touch, config),
            elevation: HomingRig::elevation(motors.elevation, color, config)?,
            claw: HomingRig::claw(motors.claw, config),
        })
    }
}

fn homing_priority(kind: ActuatorKind) -> HomingPriority {
    match kind {
        ActuatorKind::Rotation => HomingPriority::Rotation,
        ActuatorKind::Elevation => HomingPriority::Elevation,
        ActuatorKind::Claw => HomingPriority::Claw,
    }
}

fn homing_thread_name(kind: ActuatorKind) -> &'static str {
    match kind {
        ActuatorKind::Rotation => "homing-rotation",
        ActuatorKind::Elevation => "homing-elevation",
        ActuatorKind::Claw => "homing-claw",
    }
}

/// Joinable calibration threads.
pub struct CalibrationHandles {
    threads: Vec<(ActuatorKind, JoinHandle<Result<HomingRig, ArmError>>)>,
}

impl CalibrationHandles {
    /// Wait for every sequencer, then hand the rigs back.
    ///
    /// All threads are joined even when one fails; the first fault is
    /// returned.
    pub fn join(self) -> Result<HomingRigs, ArmError> {
        let mut fault = None;
        let (mut rotation, mut elevation, mut claw) = (None, None, None);
        for (kind, handle) in self.threads {
            match join_task(homing_thread_name(kind), handle) {
                Ok(rig) => match kind {
                    ActuatorKind::Rotation => rotation = Some(rig),
                    ActuatorKind::Elevation => elevation = Some(rig),
                    ActuatorKind::Claw => claw = Some(rig),
                },
                Err(err) => first_error(&mut fault, err),
            }
        }
        if let Some(err) = fault {
            return Err(err);
        }
        match (rotation, elevation, claw) {
            (Some(rotation), Some(elevation), Some(claw)) => Ok(HomingRigs {
                rotation,
                elevation,
                claw,
            }),
            _ => Err(ArmError::Scheduling(
                "calibration ended without every actuator".to_string(),
            )),
        }
    }
}

/// Start one calibration thread per actuator.
pub fn run_calibration(
    rigs: HomingRigs,
    config: &ArmConfig,
    state: &Arc<SharedControlState>,
) -> Result<CalibrationHandles, ArmError> {
    let period = config.periods.motor();
    let polling = MotionPolling::from(&config.motion);
    let seek_timeout = config.motion.homing_timeout();
    start_homing(rigs, state, |mut rig| {
        let kind = rig.kind();
        spawn_task(
            homing_thread_name(kind),
            homing_priority(kind),
            &config.scheduling,
            state,
            move || {
                rig.calibrate(period, &polling, seek_timeout)?;
                Ok(rig)
            },
        )
    })
}

/// Start the rigs in homing order.  If one cannot be started, shutdown is
/// requested and the sequencers already running are joined before the error
/// is returned, so no motor is left homing unattended.
fn start_homing<S>(
    rigs: HomingRigs,
    state: &SharedControlState,
    mut spawn: S,
) -> Result<CalibrationHandles, ArmError>
where
    S: FnMut(HomingRig) -> Result<JoinHandle<Result<HomingRig, ArmError>>, ArmError>,
{
    let mut threads = Vec::with_capacity(3);
    for rig in [rigs.elevation, rigs.rotation, rigs.claw] {
        let kind = rig.kind();
        match spawn(rig) {
            Ok(handle) => threads.push((kind, handle)),
            Err(err) => {
                state.request_shutdown();
                for (started, handle) in threads {
                    if let Err(joined) = join_task(homing_thread_name(started), handle) {
                        warn!(actuator = started.name(), error = %joined, "sequencer failed while unwinding");
                    }
                }
                return Err(err);
            }
        }
    }
    Ok(CalibrationHandles { threads })
}

// ────────────────────────────────────────────────────────────────────────────
// Steady state
// ────────────────────────────────────────────────────────────────────────────

/// The eight steady-state tasks, ready to run.
pub struct SteadyStateParts {
    pub input: InputDispatcher,
    pub color: LimitMonitor,
    pub touch: LimitMonitor,
    pub rotation: AxisController,
    pub elevation: AxisController,
    pub claw: ClawController,
    pub status_light: StatusLight,
    pub reporter: Reporter,
}

impl SteadyStateParts {
    /// Build every task from calibrated rigs and the remaining devices.
    pub fn assemble(
        rigs: HomingRigs,
        buttons: Box<dyn armctl_hal::ButtonPad>,
        lights: Box<dyn armctl_hal::StatusLights>,
        screen: Box<dyn armctl_hal::Screen>,
        config: &ArmConfig,
        state: &Arc<SharedControlState>,
    ) -> Result<Self, ArmError> {
        let (rotation_motor, touch) = rigs.rotation.into_parts();
        let (elevation_motor, color) = rigs.elevation.into_parts();
        let (claw_motor, _) = rigs.claw.into_parts();
        let touch = touch.ok_or_else(|| ArmError::fault("touch", "not returned by calibration"))?;
        let color = color.ok_or_else(|| ArmError::fault("color", "not returned by calibration"))?;
        let polling = MotionPolling::from(&config.motion);

        Ok(Self {
            input: InputDispatcher::new(buttons, state.clone()),
            color: LimitMonitor::reflection(color, &config.sensors, state.clone())?,
            touch: LimitMonitor::touch(touch, &config.sensors, state.clone()),
            rotation: AxisController::new(
                Axis::Rotation,
                rotation_motor,
                config.rotation.clone(),
                polling,
                state.clone(),
            ),
            elevation: AxisController::new(
                Axis::Elevation,
                elevation_motor,
                config.elevation.clone(),
                polling,
                state.clone(),
            ),
            claw: ClawController::new(claw_motor, config.claw.clone(), polling, state.clone()),
            status_light: StatusLight::new(lights, state.clone()),
            reporter: Reporter::new(screen, config.display.clone(), state.clone()),
        })
    }
}

type MotorTask = (ActuatorKind, JoinHandle<Result<Box<dyn Motor>, ArmError>>);
type PlainTask = (&'static str, JoinHandle<Result<(), ArmError>>);

/// Joinable steady-state threads.
pub struct SteadyStateHandles {
    state: Arc<SharedControlState>,
    motors: Vec<MotorTask>,
    others: Vec<PlainTask>,
}

/// What the steady-state tasks left behind.
pub struct SteadyStateReport {
    /// Motors handed back by controllers that exited cleanly.
    pub motors: Vec<(ActuatorKind, Box<dyn Motor>)>,
    /// The first fault of any task.
    pub error: Option<ArmError>,
}

impl SteadyStateHandles {
    pub fn request_shutdown(&self) {
        self.state.request_shutdown();
    }

    /// Wait for every task to exit.
    pub fn join(self) -> SteadyStateReport {
        let mut error = None;
        let mut motors = Vec::with_capacity(self.motors.len());
        for (kind, handle) in self.motors {
            match join_task(kind.name(), handle) {
                Ok(motor) => motors.push((kind, motor)),
                Err(err) => first_error(&mut error, err),
            }
        }
        for (name, handle) in self.others {
            if let Err(err) = join_task(name, handle) {
                first_error(&mut error, err);
            }
        }
        SteadyStateReport { motors, error }
    }
}

/// Start the eight steady-state tasks.
///
/// If a thread cannot be spawned, shutdown is requested, the tasks already
/// running are joined, their motors are parked and the spawn failure is
/// returned.
pub fn run_steady_state(
    state: Arc<SharedControlState>,
    parts: SteadyStateParts,
    config: &ArmConfig,
) -> Result<SteadyStateHandles, ArmError> {
    let mut handles = SteadyStateHandles {
        state: state.clone(),
        motors: Vec::with_capacity(3),
        others: Vec::with_capacity(5),
    };
    if let Err(err) = spawn_steady_state(&mut handles, parts, config) {
        return Err(abandon_steady_state(
            handles,
            &MotionPolling::from(&config.motion),
            err,
        ));
    }
    Ok(handles)
}

/// Wind down a partially started steady state and hand back `err`.
fn abandon_steady_state(
    handles: SteadyStateHandles,
    polling: &MotionPolling,
    err: ArmError,
) -> ArmError {
    handles.request_shutdown();
    let mut report = handles.join();
    if let Some(task_err) = &report.error {
        warn!(error = %task_err, "task failed while unwinding start-up");
    }
    if let Err(park_err) = park(&mut report.motors, polling) {
        warn!(error = %park_err, "park failed while unwinding start-up");
    }
    err
}

fn spawn_steady_state(
    handles: &mut SteadyStateHandles,
    parts: SteadyStateParts,
    config: &ArmConfig,
) -> Result<(), ArmError> {
    let periods = &config.periods;
    let sched = &config.scheduling;
    let state = handles.state.clone();
    let SteadyStateParts {
        input,
        color,
        touch,
        rotation,
        elevation,
        claw,
        status_light,
        reporter,
    } = parts;

    let p = periods.dispatcher();
    handles.others.push((
        "input",
        spawn_task("input", TaskPriority::Sensing, sched, &state, move || input.run(p))?,
    ));
    let p = periods.color();
    handles.others.push((
        "color",
        spawn_task("color", TaskPriority::Sensing, sched, &state, move || color.run(p))?,
    ));
    let p = periods.touch();
    handles.others.push((
        "touch",
        spawn_task("touch", TaskPriority::Sensing, sched, &state, move || touch.run(p))?,
    ));

    let p = periods.motor();
    handles.motors.push((
        ActuatorKind::Rotation,
        spawn_task("rotation", TaskPriority::Actuation, sched, &state, move || {
            rotation.run(p)
        })?,
    ));
    handles.motors.push((
        ActuatorKind::Elevation,
        spawn_task("elevation", TaskPriority::Actuation, sched, &state, move || {
            elevation.run(p)
        })?,
    ));
    handles.motors.push((
        ActuatorKind::Claw,
        spawn_task("claw", TaskPriority::Actuation, sched, &state, move || claw.run(p))?,
    ));

    let p = periods.status_light();
    handles.others.push((
        "status-light",
        spawn_task("status-light", TaskPriority::Indication, sched, &state, move || {
            status_light.run(p)
        })?,
    ));
    let p = periods.reporter();
    handles.others.push((
        "reporter",
        spawn_task("reporter", TaskPriority::Indication, sched, &state, move || {
            reporter.run(p)
        })?,
    ));
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Parking
// ────────────────────────────────────────────────────────────────────────────

/// Drive every motor to absolute zero and wait for all of them.
///
/// All moves are issued before the first wait so the actuators park
/// together.  Every motor is waited on even if another fails; the first
/// fault is returned.
pub fn park(motors: &mut [(ActuatorKind, Box<dyn Motor>)], polling: &MotionPolling) -> Result<(), ArmError> {
    let mut fault = None;
    for (kind, motor) in motors.iter_mut() {
        let issued = motor
            .set_target_position(0)
            .and_then(|_| motor.run(RunMode::AbsolutePosition));
        if let Err(err) = issued {
            warn!(actuator = kind.name(), error = %err, "park command failed");
            first_error(&mut fault, err);
        }
    }
    thread::sleep(polling.settle);
    for (kind, motor) in motors.iter_mut() {
        if let Err(err) = await_motion_complete(motor.as_mut(), polling.poll_interval, polling.deadline) {
            warn!(actuator = kind.name(), error = %err, "park did not complete");
            first_error(&mut fault, err);
        }
    }
    match fault {
        Some(err) => Err(err),
        None => {
            info!(parked = motors.len(), "actuators parked");
            Ok(())
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

/// One run of the arm, from calibration to parking.
pub struct ArmSession {
    config: ArmConfig,
    state: Arc<SharedControlState>,
}

impl ArmSession {
    pub fn new(config: ArmConfig) -> Self {
        Self {
            config,
            state: Arc::new(SharedControlState::new()),
        }
    }

    /// The session's shared registers, e.g. for a signal handler.
    pub fn state(&self) -> Arc<SharedControlState> {
        self.state.clone()
    }

    pub fn request_shutdown(&self) {
        self.state.request_shutdown();
    }

    /// Calibrate, run until shutdown, then park.
    ///
    /// # Errors
    ///
    /// The first fault of any task.  A calibration fault aborts before
    /// steady state; a steady-state fault still parks the motors whose
    /// controllers exited cleanly.
    pub fn run(&self, hardware: ArmHardware) -> Result<(), ArmError> {
        let config = &self.config;
        let ArmHardware {
            motors,
            touch,
            color,
            buttons,
            lights,
            screen,
        } = hardware;

        info!("calibrating");
        let rigs = HomingRigs::from_hardware(motors, touch, color, config)?;
        let rigs = run_calibration(rigs, config, &self.state)?.join()?;

        info!("entering steady state");
        let parts = SteadyStateParts::assemble(rigs, buttons, lights, screen, config, &self.state)?;
        let report = run_steady_state(self.state.clone(), parts, config)?.join();

        info!("parking");
        let mut motors = report.motors;
        let parked = park(&mut motors, &MotionPolling::from(&config.motion));
        match report.error {
            Some(err) => Err(err),
            None => parked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armctl_hal::MotorCommand;
    use armctl_hal::sim::{SimMotor, SimMotorSpec, SimSensor};
    use armctl_kernel::run_periodic;
    use armctl_types::{MotorState, StopMode};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct MockMotor {
        id: &'static str,
        log: Arc<Mutex<Vec<MotorCommand>>>,
        fail: bool,
    }

    impl Motor for MockMotor {
        fn id(&self) -> &str {
            self.id
        }
        fn max_speed(&self) -> i32 {
            900
        }
        fn set_power(&mut self, duty: i32) -> Result<(), ArmError> {
            self.log.lock().unwrap().push(MotorCommand::SetPower(duty));
            Ok(())
        }
        fn run(&mut self, mode: RunMode) -> Result<(), ArmError> {
            if self.fail {
                return Err(ArmError::fault(self.id, "tacho lost"));
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
            Ok(0)
        }
        fn state(&mut self) -> Result<MotorState, ArmError> {
            Ok(MotorState::default())
        }
    }

    fn polling() -> MotionPolling {
        MotionPolling {
            settle: Duration::ZERO,
            poll_interval: Duration::from_millis(1),
            deadline: Some(Duration::from_secs(1)),
        }
    }

    #[test]
    fn park_moves_every_motor_to_zero() {
        let logs: Vec<_> = (0..3).map(|_| Arc::new(Mutex::new(Vec::new()))).collect();
        let mut motors: Vec<(ActuatorKind, Box<dyn Motor>)> = [
            ActuatorKind::Rotation,
            ActuatorKind::Elevation,
            ActuatorKind::Claw,
        ]
        .into_iter()
        .zip(&logs)
        .map(|(kind, log)| {
            let motor: Box<dyn Motor> = Box::new(MockMotor {
                id: kind.name(),
                log: log.clone(),
                fail: false,
            });
            (kind, motor)
        })
        .collect();

        park(&mut motors, &polling()).unwrap();
        for log in &logs {
            assert_eq!(
                *log.lock().unwrap(),
                vec![
                    MotorCommand::SetTarget(0),
                    MotorCommand::Run(RunMode::AbsolutePosition)
                ]
            );
        }
    }

    #[test]
    fn park_reports_fault_but_parks_the_rest() {
        let good = Arc::new(Mutex::new(Vec::new()));
        let mut motors: Vec<(ActuatorKind, Box<dyn Motor>)> = vec![
            (
                ActuatorKind::Rotation,
                Box::new(MockMotor {
                    id: "rotation",
                    log: Arc::default(),
                    fail: true,
                }),
            ),
            (
                ActuatorKind::Claw,
                Box::new(MockMotor {
                    id: "claw",
                    log: good.clone(),
                    fail: false,
                }),
            ),
        ];
        let err = park(&mut motors, &polling()).unwrap_err();
        assert_eq!(err, ArmError::fault("rotation", "tacho lost"));
        assert!(good
            .lock()
            .unwrap()
            .contains(&MotorCommand::Run(RunMode::AbsolutePosition)));
    }

    #[test]
    fn failing_task_requests_shutdown() {
        let state = Arc::new(SharedControlState::new());
        let sched = SchedulingConfig {
            realtime: false,
            require_realtime: false,
        };
        let handle = spawn_task("doomed", TaskPriority::Sensing, &sched, &state, || {
            Err::<(), _>(ArmError::fault("color", "unplugged"))
        })
        .unwrap();
        let err = join_task("doomed", handle).unwrap_err();
        assert_eq!(err, ArmError::fault("color", "unplugged"));
        assert!(state.shutdown_requested());
    }

    #[test]
    fn panicking_task_maps_to_task_panicked() {
        let state = Arc::new(SharedControlState::new());
        let sched = SchedulingConfig {
            realtime: false,
            require_realtime: false,
        };
        let handle = spawn_task(
            "reporter",
            TaskPriority::Indication,
            &sched,
            &state,
            || -> Result<(), ArmError> { panic!("screen driver bug") },
        )
        .unwrap();
        let err = join_task("reporter", handle).unwrap_err();
        assert_eq!(err, ArmError::TaskPanicked("reporter".to_string()));
        assert!(state.shutdown_requested());
    }

    fn sim_rigs() -> HomingRigs {
        let config = ArmConfig::default();
        HomingRigs {
            rotation: HomingRig::rotation(
                Box::new(SimMotor::new("rotation", SimMotorSpec::large())),
                Box::new(SimSensor::scripted("touch", vec![0])),
                &config,
            ),
            elevation: HomingRig::elevation(
                Box::new(SimMotor::new("elevation", SimMotorSpec::large())),
                Box::new(SimSensor::scripted("color", vec![0])),
                &config,
            )
            .unwrap(),
            claw: HomingRig::claw(Box::new(SimMotor::new("claw", SimMotorSpec::medium())), &config),
        }
    }

    #[test]
    fn failed_homing_start_joins_sequencers_already_running() {
        let state = Arc::new(SharedControlState::new());
        let finished = Arc::new(AtomicBool::new(false));
        let mut started = Vec::new();

        let result = start_homing(sim_rigs(), &state, |rig| {
            started.push(rig.kind());
            if started.len() > 1 {
                return Err(ArmError::Scheduling("cannot spawn homing-rotation".to_string()));
            }
            let finished = finished.clone();
            Ok(thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                finished.store(true, Ordering::SeqCst);
                Ok(rig)
            }))
        });

        let err = match result {
            Ok(_) => panic!("start-up should fail"),
            Err(err) => err,
        };
        assert_eq!(err, ArmError::Scheduling("cannot spawn homing-rotation".to_string()));
        assert_eq!(started, vec![ActuatorKind::Elevation, ActuatorKind::Rotation]);
        assert!(finished.load(Ordering::SeqCst), "running sequencer was not joined");
        assert!(state.shutdown_requested());
    }

    #[test]
    fn failed_steady_start_parks_controllers_already_running() {
        let state = Arc::new(SharedControlState::new());
        let sched = SchedulingConfig {
            realtime: false,
            require_realtime: false,
        };
        let log = Arc::new(Mutex::new(Vec::new()));
        let motor: Box<dyn Motor> = Box::new(MockMotor {
            id: "rotation",
            log: log.clone(),
            fail: false,
        });
        let task_state = state.clone();
        let rotation = spawn_task("rotation", TaskPriority::Actuation, &sched, &state, move || {
            run_periodic("rotation", Duration::from_millis(2), &task_state, || Ok(()))?;
            Ok(motor)
        })
        .unwrap();
        let handles = SteadyStateHandles {
            state: state.clone(),
            motors: vec![(ActuatorKind::Rotation, rotation)],
            others: Vec::new(),
        };

        let err = abandon_steady_state(
            handles,
            &polling(),
            ArmError::Scheduling("cannot spawn reporter".to_string()),
        );

        assert_eq!(err, ArmError::Scheduling("cannot spawn reporter".to_string()));
        assert!(state.shutdown_requested());
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                MotorCommand::SetTarget(0),
                MotorCommand::Run(RunMode::AbsolutePosition)
            ]
        );
    }

    #[test]
    fn homing_priorities_follow_the_declared_order() {
        assert!(homing_priority(ActuatorKind::Elevation) > homing_priority(ActuatorKind::Rotation));
        assert!(homing_priority(ActuatorKind::Rotation) > homing_priority(ActuatorKind::Claw));
        assert!(
            homing_priority(ActuatorKind::Elevation).offset_below_max()
                < homing_priority(ActuatorKind::Claw).offset_below_max()
        );
    }
}
