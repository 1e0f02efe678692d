//! Input dispatcher: operator buttons → intents, and the shutdown latch.

use std::sync::Arc;
use std::time::Duration;

use armctl_hal::{Button, ButtonPad};
use armctl_kernel::{SharedControlState, run_periodic};
use armctl_types::{ArmError, ClawIntent, ElevationIntent, RotationIntent};
use tracing::debug;

/// Opposing-pair policy for rotation: both or neither held means stop.
pub fn resolve_rotation(left: bool, right: bool) -> RotationIntent {
    match (left, right) {
        (true, false) => RotationIntent::Left,
        (false, true) => RotationIntent::Right,
        _ => RotationIntent::Stop,
    }
}

/// Opposing-pair policy for elevation: both or neither held means stop.
pub fn resolve_elevation(up: bool, down: bool) -> ElevationIntent {
    match (up, down) {
        (true, false) => ElevationIntent::Rise,
        (false, true) => ElevationIntent::Lower,
        _ => ElevationIntent::Stop,
    }
}

/// One reading of every button, taken before any register is touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub center: bool,
    pub back: bool,
}

impl ButtonSnapshot {
    pub fn read(pad: &mut dyn ButtonPad) -> Result<Self, ArmError> {
        Ok(Self {
            left: pad.is_pressed(Button::Left)?,
            right: pad.is_pressed(Button::Right)?,
            up: pad.is_pressed(Button::Up)?,
            down: pad.is_pressed(Button::Down)?,
            center: pad.is_pressed(Button::Center)?,
            back: pad.is_pressed(Button::Back)?,
        })
    }
}

/// Translates the button pad into the intent register each cycle.
pub struct InputDispatcher {
    buttons: Box<dyn ButtonPad>,
    state: Arc<SharedControlState>,
    grip_held: bool,
    last: (RotationIntent, ElevationIntent),
}

impl InputDispatcher {
    pub fn new(buttons: Box<dyn ButtonPad>, state: Arc<SharedControlState>) -> Self {
        Self {
            buttons,
            state,
            grip_held: false,
            last: (RotationIntent::Stop, ElevationIntent::Stop),
        }
    }

    pub fn step(&mut self) -> Result<(), ArmError> {
        let pressed = ButtonSnapshot::read(self.buttons.as_mut())?;

        let rotation = resolve_rotation(pressed.left, pressed.right);
        let elevation = resolve_elevation(pressed.up, pressed.down);
        self.state.set_axis_intents(rotation, elevation);
        if (rotation, elevation) != self.last {
            debug!(?rotation, ?elevation, "axis intents changed");
            self.last = (rotation, elevation);
        }

        // The claw controller consumes Active and resets it, so the grip is
        // written only when the button level changes: one toggle per press.
        if pressed.center != self.grip_held {
            self.grip_held = pressed.center;
            let grip = if pressed.center {
                ClawIntent::Active
            } else {
                ClawIntent::Inactive
            };
            self.state.set_claw_intent(grip);
        }

        if pressed.back {
            self.state.request_shutdown();
        }
        Ok(())
    }

    pub fn run(mut self, period: Duration) -> Result<(), ArmError> {
        let state = self.state.clone();
        run_periodic("input", period, &state, || self.step())
    }
}
