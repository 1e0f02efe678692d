//! In-process simulated hardware for tests and headless runs.
//!
//! Every simulated device comes with a cloneable handle so a test (or the CLI)
//! can drive inputs and inspect outputs while the device itself is owned by a
//! control task on another thread.
//!
//! [`SimMotor`] integrates motion against wall-clock time: in direct mode the
//! physical position advances at `power% × max_speed` ticks per second and is
//! clamped by hard stops; position moves travel at the speed set-point.
//! Pushing into a hard stop in direct mode reports the motor as stalled.
//! Sensors can be scripted or can observe a motor's physical position, which
//! lets a calibration sequence find its reference for real.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use armctl_types::{ArmError, MotorState, RunMode, SensorMode, StopMode};

use crate::input::{Button, ButtonPad};
use crate::motor::{Motor, MotorCommand};
use crate::output::{LedChannel, LedSide, Screen, StatusLights};
use crate::sensor::Sensor;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Motor
// ────────────────────────────────────────────────────────────────────────────

/// Mechanical limits of a simulated motor, in physical ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimMotorSpec {
    pub max_speed: i32,
    /// Hard stops `(min, max)` of physical travel.
    pub travel: (i32, i32),
    /// Physical position at power-on.
    pub start: i32,
}

impl SimMotorSpec {
    /// A large motor with effectively unlimited travel.
    pub fn large() -> Self {
        Self {
            max_speed: 900,
            travel: (i32::MIN / 2, i32::MAX / 2),
            start: 0,
        }
    }

    /// A medium motor with effectively unlimited travel.
    pub fn medium() -> Self {
        Self {
            max_speed: 1200,
            ..Self::large()
        }
    }

    pub fn with_travel(mut self, min: i32, max: i32) -> Self {
        self.travel = (min, max);
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Move {
    from: f64,
    to: f64,
    started: Instant,
    ticks_per_sec: f64,
}

impl Move {
    fn position_at(&self, now: Instant) -> (f64, bool) {
        let distance = self.to - self.from;
        if self.ticks_per_sec <= 0.0 {
            return (self.from, distance == 0.0);
        }
        let travelled = now.duration_since(self.started).as_secs_f64() * self.ticks_per_sec;
        if travelled >= distance.abs() {
            (self.to, true)
        } else {
            (self.from + travelled * distance.signum(), false)
        }
    }
}

#[derive(Debug)]
struct Plant {
    spec: SimMotorSpec,
    physical: f64,
    encoder_offset: f64,
    power: i32,
    mode: Option<RunMode>,
    target: i32,
    speed: i32,
    stop_mode: StopMode,
    motion: Option<Move>,
    last_update: Instant,
    stalled: bool,
    fault: Option<String>,
    log: Vec<MotorCommand>,
}

impl Plant {
    fn new(spec: SimMotorSpec) -> Self {
        Self {
            spec,
            physical: f64::from(spec.start),
            encoder_offset: f64::from(spec.start),
            power: 0,
            mode: None,
            target: 0,
            speed: spec.max_speed,
            stop_mode: StopMode::Coast,
            motion: None,
            last_update: Instant::now(),
            stalled: false,
            fault: None,
            log: Vec::new(),
        }
    }

    fn clamp(&self, physical: f64) -> f64 {
        let (min, max) = self.spec.travel;
        physical.clamp(f64::from(min), f64::from(max))
    }

    /// Integrate motion up to `now`.
    fn advance(&mut self, now: Instant) {
        let dt = now.duration_since(self.last_update).as_secs_f64();
        self.last_update = now;
        if let Some(motion) = self.motion {
            let (pos, done) = motion.position_at(now);
            self.physical = self.clamp(pos);
            self.stalled = false;
            if done {
                self.motion = None;
            }
        } else if self.mode == Some(RunMode::Direct) && self.power != 0 {
            let rate = f64::from(self.power) / 100.0 * f64::from(self.spec.max_speed);
            let wanted = self.physical + rate * dt;
            let clamped = self.clamp(wanted);
            self.stalled = clamped != wanted;
            self.physical = clamped;
        } else {
            self.stalled = false;
        }
    }

    fn encoder(&self) -> i32 {
        (self.physical - self.encoder_offset).round() as i32
    }

    fn check_fault(&self, id: &str) -> Result<(), ArmError> {
        match &self.fault {
            Some(details) => Err(ArmError::fault(id, details.clone())),
            None => Ok(()),
        }
    }

    fn start_move(&mut self, to_encoder: i32, now: Instant) {
        let to = self.clamp(f64::from(to_encoder) + self.encoder_offset);
        self.motion = Some(Move {
            from: self.physical,
            to,
            started: now,
            ticks_per_sec: f64::from(self.speed.abs()),
        });
    }
}

/// Cloneable view of a [`SimMotor`]'s internal state.
#[derive(Clone)]
pub struct SimMotorHandle(Arc<Mutex<Plant>>);

impl SimMotorHandle {
    /// Every command issued so far, in order.
    pub fn commands(&self) -> Vec<MotorCommand> {
        lock(&self.0).log.clone()
    }

    /// Only the duty-cycle commands issued so far.
    pub fn power_commands(&self) -> Vec<i32> {
        lock(&self.0)
            .log
            .iter()
            .filter_map(|c| match c {
                MotorCommand::SetPower(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn clear_commands(&self) {
        lock(&self.0).log.clear();
    }

    /// Physical position, independent of encoder resets.
    pub fn physical_position(&self) -> i32 {
        let mut plant = lock(&self.0);
        plant.advance(Instant::now());
        plant.physical.round() as i32
    }

    /// Encoder position as the control core would read it.
    pub fn encoder_position(&self) -> i32 {
        let mut plant = lock(&self.0);
        plant.advance(Instant::now());
        plant.encoder()
    }

    pub fn power(&self) -> i32 {
        lock(&self.0).power
    }

    pub fn stop_mode(&self) -> StopMode {
        lock(&self.0).stop_mode
    }

    /// Make every subsequent driver call fail with `details`.
    pub fn inject_fault(&self, details: impl Into<String>) {
        lock(&self.0).fault = Some(details.into());
    }
}

/// A simulated tacho motor.
pub struct SimMotor {
    id: String,
    plant: Arc<Mutex<Plant>>,
}

impl SimMotor {
    pub fn new(id: impl Into<String>, spec: SimMotorSpec) -> Self {
        Self {
            id: id.into(),
            plant: Arc::new(Mutex::new(Plant::new(spec))),
        }
    }

    pub fn handle(&self) -> SimMotorHandle {
        SimMotorHandle(self.plant.clone())
    }

    fn with_plant<R>(&self, f: impl FnOnce(&mut Plant, Instant) -> R) -> Result<R, ArmError> {
        let mut plant = lock(&self.plant);
        plant.check_fault(&self.id)?;
        let now = Instant::now();
        plant.advance(now);
        Ok(f(&mut plant, now))
    }
}

impl Motor for SimMotor {
    fn id(&self) -> &str {
        &self.id
    }

    fn max_speed(&self) -> i32 {
        lock(&self.plant).spec.max_speed
    }

    fn set_power(&mut self, duty: i32) -> Result<(), ArmError> {
        self.with_plant(|p, _| {
            p.log.push(MotorCommand::SetPower(duty));
            p.power = duty.clamp(-100, 100);
        })
    }

    fn run(&mut self, mode: RunMode) -> Result<(), ArmError> {
        self.with_plant(|p, now| {
            p.log.push(MotorCommand::Run(mode));
            p.mode = Some(mode);
            match mode {
                RunMode::Direct => p.motion = None,
                RunMode::AbsolutePosition => p.start_move(p.target, now),
                RunMode::RelativePosition => {
                    let to = p.encoder() + p.target;
                    p.start_move(to, now);
                }
                // Timed runs are not modelled; the motor holds position.
                RunMode::Timed => p.motion = None,
            }
        })
    }

    fn set_target_position(&mut self, ticks: i32) -> Result<(), ArmError> {
        self.with_plant(|p, _| {
            p.log.push(MotorCommand::SetTarget(ticks));
            p.target = ticks;
        })
    }

    fn set_speed(&mut self, ticks_per_sec: i32) -> Result<(), ArmError> {
        self.with_plant(|p, _| {
            p.log.push(MotorCommand::SetSpeed(ticks_per_sec));
            p.speed = ticks_per_sec;
        })
    }

    fn set_stop_mode(&mut self, mode: StopMode) -> Result<(), ArmError> {
        self.with_plant(|p, _| {
            p.log.push(MotorCommand::SetStopMode(mode));
            p.stop_mode = mode;
        })
    }

    fn reset_encoder(&mut self, ticks: i32) -> Result<(), ArmError> {
        self.with_plant(|p, _| {
            p.log.push(MotorCommand::ResetEncoder(ticks));
            p.encoder_offset = p.physical - f64::from(ticks);
        })
    }

    fn position(&mut self) -> Result<i32, ArmError> {
        self.with_plant(|p, _| p.encoder())
    }

    fn state(&mut self) -> Result<MotorState, ArmError> {
        self.with_plant(|p, _| MotorState {
            running: p.motion.is_some() || (p.mode == Some(RunMode::Direct) && p.power != 0),
            stalled: p.stalled,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sensors
// ────────────────────────────────────────────────────────────────────────────

enum Source {
    /// Successive values; the last one repeats forever.
    Script { values: Vec<i32>, next: usize },
    /// Derived from a motor's physical position.
    Watch {
        motor: SimMotorHandle,
        read: Box<dyn Fn(i32) -> i32 + Send>,
    },
}

/// A simulated scalar sensor.
pub struct SimSensor {
    id: String,
    mode: Arc<Mutex<Option<SensorMode>>>,
    source: Source,
}

impl SimSensor {
    /// A sensor that replays `values`, then keeps returning the last one.
    pub fn scripted(id: impl Into<String>, values: Vec<i32>) -> Self {
        Self {
            id: id.into(),
            mode: Arc::new(Mutex::new(None)),
            source: Source::Script { values, next: 0 },
        }
    }

    /// A sensor whose sample is `read(physical position of motor)`.
    pub fn watching(
        id: impl Into<String>,
        motor: SimMotorHandle,
        read: impl Fn(i32) -> i32 + Send + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            mode: Arc::new(Mutex::new(None)),
            source: Source::Watch {
                motor,
                read: Box::new(read),
            },
        }
    }

    pub fn handle(&self) -> SimSensorHandle {
        SimSensorHandle(self.mode.clone())
    }
}

/// Cloneable view of a [`SimSensor`]'s configuration.
#[derive(Clone)]
pub struct SimSensorHandle(Arc<Mutex<Option<SensorMode>>>);

impl SimSensorHandle {
    /// The mode most recently set on the sensor, if any.
    pub fn mode(&self) -> Option<SensorMode> {
        *lock(&self.0)
    }
}

impl Sensor for SimSensor {
    fn id(&self) -> &str {
        &self.id
    }

    fn sample(&mut self) -> Result<i32, ArmError> {
        match &mut self.source {
            Source::Script { values, next } => {
                let value = values
                    .get(*next)
                    .or_else(|| values.last())
                    .copied()
                    .ok_or_else(|| ArmError::fault(&self.id, "empty sample script"))?;
                *next += 1;
                Ok(value)
            }
            Source::Watch { motor, read } => Ok(read(motor.physical_position())),
        }
    }

    fn set_mode(&mut self, mode: SensorMode) -> Result<(), ArmError> {
        *lock(&self.mode) = Some(mode);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Buttons
// ────────────────────────────────────────────────────────────────────────────

/// Cloneable remote control for [`SimButtons`].
#[derive(Clone, Default)]
pub struct SimButtonsHandle(Arc<Mutex<HashSet<Button>>>);

impl SimButtonsHandle {
    pub fn press(&self, button: Button) {
        lock(&self.0).insert(button);
    }

    pub fn release(&self, button: Button) {
        lock(&self.0).remove(&button);
    }

    pub fn release_all(&self) {
        lock(&self.0).clear();
    }
}

/// A simulated button pad driven through its [`SimButtonsHandle`].
#[derive(Default)]
pub struct SimButtons {
    held: SimButtonsHandle,
}

impl SimButtons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> SimButtonsHandle {
        self.held.clone()
    }
}

impl ButtonPad for SimButtons {
    fn is_pressed(&mut self, button: Button) -> Result<bool, ArmError> {
        Ok(lock(&self.held.0).contains(&button))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Status lights
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct LightsState {
    writes: usize,
    levels: [[u8; 2]; 2],
}

fn led_index(side: LedSide, channel: LedChannel) -> (usize, usize) {
    let s = match side {
        LedSide::Left => 0,
        LedSide::Right => 1,
    };
    let c = match channel {
        LedChannel::Red => 0,
        LedChannel::Green => 1,
    };
    (s, c)
}

/// Cloneable view of [`SimLights`].
#[derive(Clone, Default)]
pub struct SimLightsHandle(Arc<Mutex<LightsState>>);

impl SimLightsHandle {
    pub fn level(&self, side: LedSide, channel: LedChannel) -> u8 {
        let (s, c) = led_index(side, channel);
        lock(&self.0).levels[s][c]
    }

    /// Number of channel writes issued so far.
    pub fn writes(&self) -> usize {
        lock(&self.0).writes
    }
}

/// Simulated bi-color status LEDs.
#[derive(Default)]
pub struct SimLights {
    state: SimLightsHandle,
}

impl SimLights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> SimLightsHandle {
        self.state.clone()
    }
}

impl StatusLights for SimLights {
    fn set_indicator(
        &mut self,
        side: LedSide,
        channel: LedChannel,
        intensity: u8,
    ) -> Result<(), ArmError> {
        let (s, c) = led_index(side, channel);
        let mut state = lock(&self.state.0);
        state.levels[s][c] = intensity;
        state.writes += 1;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Screen
// ────────────────────────────────────────────────────────────────────────────

/// One primitive drawn on a [`SimScreen`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Text { x: i32, y: i32, text: String },
    Circle { x: i32, y: i32, radius: i32, filled: bool },
}

#[derive(Debug, Default)]
struct ScreenState {
    frame: Vec<DrawOp>,
    clears: usize,
}

/// Cloneable view of [`SimScreen`].
#[derive(Clone, Default)]
pub struct SimScreenHandle(Arc<Mutex<ScreenState>>);

impl SimScreenHandle {
    /// Primitives drawn since the last clear.
    pub fn frame(&self) -> Vec<DrawOp> {
        lock(&self.0).frame.clone()
    }

    pub fn clears(&self) -> usize {
        lock(&self.0).clears
    }
}

/// A simulated screen that keeps the current frame as a list of primitives.
#[derive(Default)]
pub struct SimScreen {
    state: SimScreenHandle,
}

impl SimScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> SimScreenHandle {
        self.state.clone()
    }
}

impl Screen for SimScreen {
    fn clear(&mut self) -> Result<(), ArmError> {
        let mut state = lock(&self.state.0);
        state.frame.clear();
        state.clears += 1;
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), ArmError> {
        lock(&self.state.0).frame.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
        });
        Ok(())
    }

    fn draw_circle(
        &mut self,
        x: i32,
        y: i32,
        radius: i32,
        filled: bool,
    ) -> Result<(), ArmError> {
        lock(&self.state.0).frame.push(DrawOp::Circle {
            x,
            y,
            radius,
            filled,
        });
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
