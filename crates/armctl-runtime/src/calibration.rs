//! Calibration (homing): establishing each actuator's logical zero at startup.
//!
//! Every actuator runs the same three phases:
//!
//! | Phase | Action |
//! |---|---|
//! | A – seek | hold stop-mode, direct-mode seek power, poll the reference once per period |
//! | B – back off | relative move of `backoff_ticks` at `speed_percent` of max speed |
//! | C – zero | power 0, hold stop-mode, encoder redefined as 0 |
//!
//! The reference differs per actuator: the touch switch for rotation, the
//! reflection threshold for elevation and a stalled-while-running motor for
//! the claw, which has no sensor of its own.

use std::time::{Duration, Instant};

use armctl_hal::{MotionPolling, Motor, MoveTarget, Sensor, move_to, speed_from_percent};
use armctl_kernel::PeriodicTimer;
use armctl_types::config::{ArmConfig, HomingConfig};
use armctl_types::{ActuatorKind, ArmError, RunMode, SensorMode, StopMode};
use tracing::{debug, info};

use crate::sensors::Threshold;

/// How an actuator recognises its reference position.
pub enum Reference {
    /// A sensor sample meets a threshold.
    Sensor {
        sensor: Box<dyn Sensor>,
        threshold: Threshold,
    },
    /// The motor reports running and stalled at once.
    Stall,
}

impl Reference {
    fn reached(&mut self, motor: &mut dyn Motor) -> Result<bool, ArmError> {
        match self {
            Reference::Sensor { sensor, threshold } => Ok(threshold.is_met(sensor.sample()?)),
            Reference::Stall => Ok(motor.state()?.is_stalled_while_running()),
        }
    }
}

/// Everything one calibration thread owns.
pub struct HomingRig {
    kind: ActuatorKind,
    motor: Box<dyn Motor>,
    reference: Reference,
    homing: HomingConfig,
}

impl HomingRig {
    pub fn new(
        kind: ActuatorKind,
        motor: Box<dyn Motor>,
        reference: Reference,
        homing: HomingConfig,
    ) -> Self {
        Self {
            kind,
            motor,
            reference,
            homing,
        }
    }

    /// Rotation homes against the touch switch.
    pub fn rotation(motor: Box<dyn Motor>, touch: Box<dyn Sensor>, config: &ArmConfig) -> Self {
        Self::new(
            ActuatorKind::Rotation,
            motor,
            Reference::Sensor {
                sensor: touch,
                threshold: Threshold::Equals(config.sensors.touch_active),
            },
            config.rotation.homing.clone(),
        )
    }

    /// Elevation homes against the reflection threshold; switches the color
    /// sensor to reflected-light mode.
    pub fn elevation(
        motor: Box<dyn Motor>,
        mut color: Box<dyn Sensor>,
        config: &ArmConfig,
    ) -> Result<Self, ArmError> {
        color.set_mode(SensorMode::Reflect)?;
        Ok(Self::new(
            ActuatorKind::Elevation,
            motor,
            Reference::Sensor {
                sensor: color,
                threshold: Threshold::AtLeast(config.sensors.reflection_limit),
            },
            config.elevation.homing.clone(),
        ))
    }

    /// The claw homes against its own mechanical stop.
    pub fn claw(motor: Box<dyn Motor>, config: &ArmConfig) -> Self {
        Self::new(
            ActuatorKind::Claw,
            motor,
            Reference::Stall,
            config.claw.homing.clone(),
        )
    }

    pub fn kind(&self) -> ActuatorKind {
        self.kind
    }

    /// Give back the motor and, for sensor-referenced actuators, the sensor.
    pub fn into_parts(self) -> (Box<dyn Motor>, Option<Box<dyn Sensor>>) {
        let sensor = match self.reference {
            Reference::Sensor { sensor, .. } => Some(sensor),
            Reference::Stall => None,
        };
        (self.motor, sensor)
    }

    /// Run phases A, B and C.
    ///
    /// # Errors
    ///
    /// - [`ArmError::CalibrationTimeout`] if the reference is not observed
    ///   within `seek_timeout`; the motor is stopped first.
    /// - [`ArmError::MotionTimeout`] if the back-off move does not complete.
    /// - Any capability fault.
    pub fn calibrate(
        &mut self,
        period: Duration,
        polling: &MotionPolling,
        seek_timeout: Duration,
    ) -> Result<(), ArmError> {
        let name = self.kind.name();

        info!(actuator = name, "seeking reference");
        self.seek(period, seek_timeout)?;

        info!(actuator = name, ticks = self.homing.backoff_ticks, "backing off");
        let speed = speed_from_percent(self.motor.max_speed(), self.homing.speed_percent);
        self.motor.set_speed(speed)?;
        move_to(
            self.motor.as_mut(),
            MoveTarget::Relative(self.homing.backoff_ticks),
            polling,
        )?;

        self.motor.set_power(0)?;
        self.motor.set_stop_mode(StopMode::Hold)?;
        self.motor.reset_encoder(0)?;
        info!(actuator = name, "calibrated");
        Ok(())
    }

    fn seek(&mut self, period: Duration, timeout: Duration) -> Result<(), ArmError> {
        self.motor.set_stop_mode(StopMode::Hold)?;
        self.motor.set_power(self.homing.seek_power)?;
        self.motor.run(RunMode::Direct)?;

        let started = Instant::now();
        let mut timer = PeriodicTimer::new(period);
        let mut polls: u32 = 0;
        loop {
            polls += 1;
            if self.reference.reached(self.motor.as_mut())? {
                debug!(actuator = self.kind.name(), polls, "reference found");
                return Ok(());
            }
            if started.elapsed() >= timeout {
                self.motor.set_power(0)?;
                return Err(ArmError::CalibrationTimeout {
                    component: self.kind.name().to_string(),
                    waited_ms: timeout.as_millis() as u64,
                });
            }
            timer.wait();
        }
    }
}
