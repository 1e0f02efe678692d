//! `armctl-runtime` – Control Tasks & Lifecycle
//!
//! The periodic tasks of the arm and the coordinator that runs them.  Tasks
//! communicate only through
//! [`SharedControlState`][armctl_kernel::SharedControlState]; each one owns
//! the devices it drives.
//!
//! # Modules
//!
//! - [`sensors`] – [`LimitMonitor`][sensors::LimitMonitor]: color and touch
//!   monitors that latch the top and clockwise limit flags.
//! - [`input`] – [`InputDispatcher`][input::InputDispatcher]: buttons →
//!   intents with the opposing-pair policy, plus the shutdown latch.
//! - [`controller`] – [`AxisController`][controller::AxisController]: the
//!   rotation/elevation state machine, where limit and bound corrections
//!   always pre-empt operator intent.
//! - [`claw`] – [`ClawController`][claw::ClawController]: grip toggle with a
//!   timed adaptive close.
//! - [`calibration`] – [`HomingRig`][calibration::HomingRig]: the three-phase
//!   startup homing sequence.
//! - [`indicators`] – [`StatusLight`][indicators::StatusLight] and
//!   [`Reporter`][indicators::Reporter].
//! - [`lifecycle`] – [`ArmSession`][lifecycle::ArmSession]: calibration →
//!   steady state → shutdown → park.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: global
//!   `tracing` subscriber setup.

pub mod calibration;
pub mod claw;
pub mod controller;
pub mod indicators;
pub mod input;
pub mod lifecycle;
pub mod sensors;
pub mod telemetry;

pub use calibration::{HomingRig, Reference};
pub use claw::{ClawController, ClawPosition};
pub use controller::{AxisController, ControllerState, CorrectionCause, StepOutcome};
pub use indicators::{Reporter, StatusLight, local_time};
pub use input::{ButtonSnapshot, InputDispatcher, resolve_elevation, resolve_rotation};
pub use lifecycle::{
    ArmSession, CalibrationHandles, HomingRigs, SteadyStateHandles, SteadyStateParts,
    SteadyStateReport, park, run_calibration, run_steady_state,
};
pub use sensors::{LimitMonitor, Threshold};
pub use telemetry::init_tracing;
