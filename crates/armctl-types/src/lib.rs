//! `armctl-types` – vocabulary shared by every `armctl` crate.
//!
//! Operator intents, limit kinds, motor modes, scheduling priorities, the
//! global [`ArmError`] and the tunable [`ArmConfig`].

pub mod config;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::ArmConfig;

// ────────────────────────────────────────────────────────────────────────────
// Actuators and intents
// ────────────────────────────────────────────────────────────────────────────

/// The three actuators of the arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActuatorKind {
    Rotation,
    Elevation,
    Claw,
}

impl ActuatorKind {
    /// Stable lowercase name used in logs and fault messages.
    pub fn name(self) -> &'static str {
        match self {
            ActuatorKind::Rotation => "rotation",
            ActuatorKind::Elevation => "elevation",
            ActuatorKind::Claw => "claw",
        }
    }
}

/// The two positional axes driven by the shared axis state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Rotation,
    Elevation,
}

impl Axis {
    pub fn actuator(self) -> ActuatorKind {
        match self {
            Axis::Rotation => ActuatorKind::Rotation,
            Axis::Elevation => ActuatorKind::Elevation,
        }
    }

    /// The limit flag whose correction this axis owns.
    pub fn limit(self) -> LimitKind {
        match self {
            Axis::Rotation => LimitKind::Clockwise,
            Axis::Elevation => LimitKind::Top,
        }
    }
}

/// Operator intent for the rotation actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationIntent {
    Right,
    Left,
    #[default]
    Stop,
}

/// Operator intent for the elevation actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ElevationIntent {
    Rise,
    Lower,
    #[default]
    Stop,
}

/// Operator intent for the claw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClawIntent {
    Active,
    #[default]
    Inactive,
}

/// Direction an axis controller drives its motor in.
///
/// `Right` and `Rise` map to [`AxisCommand::Forward`], `Left` and `Lower` to
/// [`AxisCommand::Reverse`].  The power applied for each direction is per-axis
/// configuration, so the mapping carries no sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisCommand {
    Forward,
    Reverse,
    #[default]
    Halt,
}

impl From<RotationIntent> for AxisCommand {
    fn from(intent: RotationIntent) -> Self {
        match intent {
            RotationIntent::Right => AxisCommand::Forward,
            RotationIntent::Left => AxisCommand::Reverse,
            RotationIntent::Stop => AxisCommand::Halt,
        }
    }
}

impl From<ElevationIntent> for AxisCommand {
    fn from(intent: ElevationIntent) -> Self {
        match intent {
            ElevationIntent::Rise => AxisCommand::Forward,
            ElevationIntent::Lower => AxisCommand::Reverse,
            ElevationIntent::Stop => AxisCommand::Halt,
        }
    }
}

/// Snapshot of the intent register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Intents {
    pub rotation: RotationIntent,
    pub elevation: ElevationIntent,
    pub claw: ClawIntent,
}

impl Intents {
    /// The direction requested for `axis`.
    pub fn command_for(&self, axis: Axis) -> AxisCommand {
        match axis {
            Axis::Rotation => self.rotation.into(),
            Axis::Elevation => self.elevation.into(),
        }
    }
}

/// Latched limit conditions raised by the sensor monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitKind {
    /// Touch switch at the clockwise end of rotation travel.
    Clockwise,
    /// Reflection threshold at the top of elevation travel.
    Top,
}

impl LimitKind {
    pub fn name(self) -> &'static str {
        match self {
            LimitKind::Clockwise => "clockwise_limit",
            LimitKind::Top => "top_limit",
        }
    }
}

/// Absolute travel bound with no dedicated sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelBound {
    /// Violated when the position drops strictly below the value.
    Below(i32),
    /// Violated when the position rises strictly above the value.
    Above(i32),
}

impl TravelBound {
    pub fn is_exceeded(self, position: i32) -> bool {
        match self {
            TravelBound::Below(limit) => position < limit,
            TravelBound::Above(limit) => position > limit,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Motor and sensor modes
// ────────────────────────────────────────────────────────────────────────────

/// Motor command mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Power (duty cycle) is applied directly and changes take effect at once.
    Direct,
    AbsolutePosition,
    RelativePosition,
    Timed,
}

/// What the motor does once a position move finishes or power is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopMode {
    Coast,
    Brake,
    Hold,
}

/// Motor status as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotorState {
    pub running: bool,
    pub stalled: bool,
}

impl MotorState {
    /// Running against an obstruction: the claw's homing reference.
    pub fn is_stalled_while_running(self) -> bool {
        self.running && self.stalled
    }
}

/// Sampling mode of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorMode {
    Reflect,
    Ambient,
    Color,
    Touch,
}

// ────────────────────────────────────────────────────────────────────────────
// Scheduling priorities
// ────────────────────────────────────────────────────────────────────────────

/// Steady-state priority layers, lowest first.
///
/// Fresh input and limit samples preempt actuation, which preempts cosmetic
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Indication,
    Actuation,
    Sensing,
}

/// Calibration-phase priorities, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HomingPriority {
    Claw,
    Rotation,
    Elevation,
}

/// Anything that can be translated into a real-time scheduling priority.
pub trait SchedulingClass: Copy + std::fmt::Debug {
    /// Distance below the scheduling policy's maximum priority.
    fn offset_below_max(self) -> i32;
}

impl SchedulingClass for TaskPriority {
    fn offset_below_max(self) -> i32 {
        match self {
            TaskPriority::Sensing => 5,
            TaskPriority::Actuation => 20,
            TaskPriority::Indication => 30,
        }
    }
}

impl SchedulingClass for HomingPriority {
    fn offset_below_max(self) -> i32 {
        match self {
            HomingPriority::Elevation => 5,
            HomingPriority::Rotation => 10,
            HomingPriority::Claw => 15,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Global error type for capability faults, timeouts and startup problems.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmError {
    #[error("Capability Fault on {component}: {details}")]
    CapabilityFault { component: String, details: String },

    #[error("Motion on {component} did not complete within {waited_ms} ms")]
    MotionTimeout { component: String, waited_ms: u64 },

    #[error("Calibration of {component} found no reference within {waited_ms} ms")]
    CalibrationTimeout { component: String, waited_ms: u64 },

    #[error("Scheduling Error: {0}")]
    Scheduling(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Task {0} panicked")]
    TaskPanicked(String),
}

impl ArmError {
    /// Shorthand for a [`ArmError::CapabilityFault`].
    pub fn fault(component: impl Into<String>, details: impl Into<String>) -> Self {
        ArmError::CapabilityFault {
            component: component.into(),
            details: details.into(),
        }
    }
}
