//! Output devices: the two bi-color status LEDs and the monochrome screen.

use armctl_types::ArmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedChannel {
    Red,
    Green,
}

/// Status LEDs, one red and one green channel per side.
pub trait StatusLights: Send {
    /// Drive one channel of one LED to `intensity` (0 = off, 255 = full).
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::CapabilityFault`] if the command cannot be applied.
    fn set_indicator(
        &mut self,
        side: LedSide,
        channel: LedChannel,
        intensity: u8,
    ) -> Result<(), ArmError>;
}

/// A small pixel display.
pub trait Screen: Send {
    fn clear(&mut self) -> Result<(), ArmError>;

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), ArmError>;

    /// Draw a circle centred at `(x, y)`, either filled or as an outline.
    fn draw_circle(&mut self, x: i32, y: i32, radius: i32, filled: bool)
    -> Result<(), ArmError>;
}
