//! [`SimArm`] – a complete simulated arm for tests and headless runs.
//!
//! Builds an [`ArmHardware`] whose every slot is backed by a [`crate::sim`]
//! driver, plus a [`SimArmHandles`] for driving buttons and inspecting
//! motors, lights and the screen from outside the control tasks.
//!
//! # Simulated geometry
//!
//! All positions below are physical ticks, unaffected by encoder resets.
//!
//! | Part | Behaviour |
//! |---|---|
//! | Rotation | touch switch pressed while position ≥ `touch_at` |
//! | Elevation | reflection reads high while position ≤ `reflect_at` |
//! | Claw | hard stop at `claw_stop`; pushing into it stalls the motor |
//!
//! The defaults start each actuator a short way from its reference so a full
//! calibration finishes in about a second.
//!
//! # Example
//!
//! ```rust
//! use armctl_hal::sim_arm::SimArm;
//! use armctl_hal::input::Button;
//!
//! let (hardware, handles) = SimArm::builder().build();
//! handles.buttons.press(Button::Back);
//! drop(hardware);
//! ```

use crate::hardware::{ArmHardware, ArmMotors};
use crate::input::Button;
use crate::sim::{
    SimButtons, SimButtonsHandle, SimLights, SimLightsHandle, SimMotor, SimMotorHandle,
    SimMotorSpec, SimScreen, SimScreenHandle, SimSensor, SimSensorHandle,
};

/// Reflection value reported over the elevation reference.
const REFLECT_HIGH: i32 = 60;
/// Reflection value reported elsewhere.
const REFLECT_LOW: i32 = 5;

/// Outside views of every simulated device.
#[derive(Clone)]
pub struct SimArmHandles {
    pub rotation: SimMotorHandle,
    pub elevation: SimMotorHandle,
    pub claw: SimMotorHandle,
    /// Mode the control core last put the color sensor in.
    pub color: SimSensorHandle,
    pub buttons: SimButtonsHandle,
    pub lights: SimLightsHandle,
    pub screen: SimScreenHandle,
}

impl SimArmHandles {
    /// Press `button` until [`SimButtonsHandle::release`] is called.
    pub fn press(&self, button: Button) {
        self.buttons.press(button);
    }
}

/// Builder for a simulated arm.
#[derive(Debug, Clone)]
pub struct SimArm {
    rotation_start: i32,
    touch_at: i32,
    elevation_start: i32,
    reflect_at: i32,
    claw_start: i32,
    claw_stop: i32,
    color_script: Option<Vec<i32>>,
}

impl Default for SimArm {
    fn default() -> Self {
        Self {
            rotation_start: 100,
            touch_at: 150,
            elevation_start: -60,
            reflect_at: -100,
            claw_start: -80,
            claw_stop: -120,
            color_script: None,
        }
    }
}

impl SimArm {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Physical start position of the rotation motor.
    pub fn rotation_start(mut self, ticks: i32) -> Self {
        self.rotation_start = ticks;
        self
    }

    /// Physical position where the rotation touch switch closes.
    pub fn touch_at(mut self, ticks: i32) -> Self {
        self.touch_at = ticks;
        self
    }

    pub fn elevation_start(mut self, ticks: i32) -> Self {
        self.elevation_start = ticks;
        self
    }

    /// Physical position at or past which (more negative) the color sensor sees
    /// the reference.
    pub fn reflect_at(mut self, ticks: i32) -> Self {
        self.reflect_at = ticks;
        self
    }

    pub fn claw_start(mut self, ticks: i32) -> Self {
        self.claw_start = ticks;
        self
    }

    /// Replace the position-derived color readings with a fixed script.
    pub fn color_script(mut self, values: Vec<i32>) -> Self {
        self.color_script = Some(values);
        self
    }

    /// Consume the builder and return the hardware bundle with its handles.
    pub fn build(self) -> (ArmHardware, SimArmHandles) {
        let rotation = SimMotor::new(
            "rotation",
            SimMotorSpec {
                start: self.rotation_start,
                ..SimMotorSpec::large()
            },
        );
        let elevation = SimMotor::new(
            "elevation",
            SimMotorSpec {
                start: self.elevation_start,
                ..SimMotorSpec::large()
            },
        );
        let claw_spec = SimMotorSpec {
            start: self.claw_start,
            ..SimMotorSpec::medium().with_travel(self.claw_stop, i32::MAX / 2)
        };
        let claw = SimMotor::new("claw", claw_spec);

        let touch_at = self.touch_at;
        let touch = SimSensor::watching("touch", rotation.handle(), move |pos| {
            i32::from(pos >= touch_at)
        });

        let color = match self.color_script {
            Some(values) => SimSensor::scripted("color", values),
            None => {
                let reflect_at = self.reflect_at;
                SimSensor::watching("color", elevation.handle(), move |pos| {
                    if pos <= reflect_at {
                        REFLECT_HIGH
                    } else {
                        REFLECT_LOW
                    }
                })
            }
        };

        let buttons = SimButtons::new();
        let lights = SimLights::new();
        let screen = SimScreen::new();

        let handles = SimArmHandles {
            rotation: rotation.handle(),
            elevation: elevation.handle(),
            claw: claw.handle(),
            color: color.handle(),
            buttons: buttons.handle(),
            lights: lights.handle(),
            screen: screen.handle(),
        };

        let hardware = ArmHardware {
            motors: ArmMotors {
                rotation: Box::new(rotation),
                elevation: Box::new(elevation),
                claw: Box::new(claw),
            },
            touch: Box::new(touch),
            color: Box::new(color),
            buttons: Box::new(buttons),
            lights: Box::new(lights),
            screen: Box::new(screen),
        };

        (hardware, handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armctl_types::RunMode;

    #[test]
    fn references_follow_physical_positions() {
        let (mut hw, _handles) = SimArm::builder()
            .rotation_start(150)
            .elevation_start(-100)
            .build();
        assert_eq!(hw.touch.sample().unwrap(), 1);
        assert_eq!(hw.color.sample().unwrap(), REFLECT_HIGH);

        let (mut hw, _handles) = SimArm::builder().build();
        assert_eq!(hw.touch.sample().unwrap(), 0);
        assert_eq!(hw.color.sample().unwrap(), REFLECT_LOW);
    }

    #[test]
    fn color_script_overrides_geometry() {
        let (mut hw, _handles) = SimArm::builder().color_script(vec![10, 31]).build();
        assert_eq!(hw.color.sample().unwrap(), 10);
        assert_eq!(hw.color.sample().unwrap(), 31);
    }

    #[test]
    fn claw_stalls_against_its_stop() {
        let (mut hw, handles) = SimArm::builder().claw_start(-118).build();
        hw.motors.claw.set_power(-40).unwrap();
        hw.motors.claw.run(RunMode::Direct).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(30));
        assert!(hw.motors.claw.state().unwrap().is_stalled_while_running());
        assert_eq!(handles.claw.physical_position(), -120);
    }

    #[test]
    fn handles_reach_the_devices() {
        let (mut hw, handles) = SimArm::builder().build();
        handles.press(Button::Center);
        assert!(hw.buttons.is_pressed(Button::Center).unwrap());
        hw.motors.rotation.set_power(30).unwrap();
        assert_eq!(handles.rotation.power_commands(), vec![30]);
    }
}
