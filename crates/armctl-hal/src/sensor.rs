//! Generic `Sensor` trait for scalar sensors (color reflection, touch switch).

use armctl_types::{ArmError, SensorMode};

/// A sensor that yields one integer per sample.
///
/// For a color sensor in [`SensorMode::Reflect`] the sample is the reflected
/// light level; for a touch switch it is `1` while pressed and `0` otherwise.
pub trait Sensor: Send {
    /// Stable identifier for this sensor, e.g. `"color"`.
    fn id(&self) -> &str;

    /// Take a fresh sample.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::CapabilityFault`] if the value cannot be read
    /// (e.g. the sensor was unplugged).
    fn sample(&mut self) -> Result<i32, ArmError>;

    /// Switch the sampling mode.
    fn set_mode(&mut self, mode: SensorMode) -> Result<(), ArmError>;
}
