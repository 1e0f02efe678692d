//! `armctl-kernel` – Shared State & Real-Time Scheduling
//!
//! The primitives every control task is built from.  Nothing in here talks to
//! hardware.
//!
//! # Modules
//!
//! - [`shared_state`] – [`SharedControlState`][shared_state::SharedControlState]:
//!   mutex-guarded intent, limit, correction, shutdown and claw-used
//!   registers, one lock per group, plus the RAII
//!   [`CorrectionGuard`][shared_state::CorrectionGuard].
//! - [`periodic`] – [`PeriodicTimer`][periodic::PeriodicTimer] and
//!   [`run_periodic`][periodic::run_periodic]: absolute-deadline periodic
//!   execution with overrun accounting and cooperative shutdown.
//! - [`priority`] – [`apply_priority`][priority::apply_priority]: maps a
//!   declared priority layer onto SCHED_FIFO for the calling thread.

pub mod periodic;
pub mod priority;
pub mod shared_state;

pub use periodic::{PeriodicTimer, run_periodic};
pub use priority::{PriorityOutcome, apply_priority};
pub use shared_state::{CorrectionGuard, SharedControlState};
