//! Operator button pad.

use armctl_types::ArmError;

/// The six logical buttons of the control brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    /// Grip toggle.
    Center,
    /// Ends the session.
    Back,
}

impl Button {
    pub const ALL: [Button; 6] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::Center,
        Button::Back,
    ];
}

/// A set of momentary push buttons.
pub trait ButtonPad: Send {
    /// `true` while `button` is held down.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::CapabilityFault`] if the pad cannot be read.
    fn is_pressed(&mut self, button: Button) -> Result<bool, ArmError>;
}
