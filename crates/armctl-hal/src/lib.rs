//! `armctl-hal` – Capability Layer
//!
//! The opaque device capabilities the control core calls into.  Opening and
//! discovering devices is the caller's job; the core only ever sees these
//! traits.
//!
//! # Modules
//!
//! - [`motor`] – [`Motor`][motor::Motor]: duty-cycle and position control of
//!   one tacho motor.
//! - [`sensor`] – [`Sensor`][sensor::Sensor]: scalar color/touch sensors.
//! - [`input`] – [`ButtonPad`][input::ButtonPad] and the six
//!   [`Button`][input::Button]s.
//! - [`output`] – [`StatusLights`][output::StatusLights] and
//!   [`Screen`][output::Screen].
//! - [`motion`] – [`await_motion_complete`][motion::await_motion_complete]
//!   and [`move_to`][motion::move_to]: bounded polling for position moves.
//! - [`hardware`] – [`ArmHardware`][hardware::ArmHardware]: the bundle of
//!   every device the core drives.
//! - [`sim`] / [`sim_arm`] – in-process simulated devices and a
//!   [`SimArm`][sim_arm::SimArm] builder for tests and headless runs.

pub mod hardware;
pub mod input;
pub mod motion;
pub mod motor;
pub mod output;
pub mod sensor;
pub mod sim;
pub mod sim_arm;

pub use hardware::{ArmHardware, ArmMotors};
pub use input::{Button, ButtonPad};
pub use motion::{MotionPolling, MoveTarget, await_motion_complete, move_to};
pub use motor::{Motor, MotorCommand, speed_from_percent};
pub use output::{LedChannel, LedSide, Screen, StatusLights};
pub use sensor::Sensor;
pub use sim_arm::{SimArm, SimArmHandles};
