//! [`ArmConfig`] – every tunable constant of the controller.
//!
//! Missing sections fall back to their defaults, so a TOML file only needs to
//! name what it changes.  The axis sections are the exception inside a
//! section: an `[elevation]` table must be complete, because rotation and
//! elevation have different defaults.  Durations are stored as milliseconds
//! and exposed as [`Duration`] through accessor methods.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Axis, TravelBound};

/// Root configuration for a control session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    pub periods: PeriodConfig,
    pub rotation: AxisConfig,
    pub elevation: AxisConfig,
    pub claw: ClawConfig,
    pub sensors: SensorConfig,
    pub motion: MotionConfig,
    pub scheduling: SchedulingConfig,
    pub display: DisplayConfig,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            periods: PeriodConfig::default(),
            rotation: AxisConfig::rotation(),
            elevation: AxisConfig::elevation(),
            claw: ClawConfig::default(),
            sensors: SensorConfig::default(),
            motion: MotionConfig::default(),
            scheduling: SchedulingConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl ArmConfig {
    /// Configuration of one positional axis.
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::Rotation => &self.rotation,
            Axis::Elevation => &self.elevation,
        }
    }
}

/// Task periods in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodConfig {
    pub dispatcher_ms: u64,
    pub color_ms: u64,
    pub touch_ms: u64,
    /// Shared by the three actuator controllers and the calibration sequencers.
    pub motor_ms: u64,
    pub status_light_ms: u64,
    pub reporter_ms: u64,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            dispatcher_ms: 180,
            color_ms: 200,
            touch_ms: 200,
            motor_ms: 90,
            status_light_ms: 40,
            reporter_ms: 500,
        }
    }
}

impl PeriodConfig {
    pub fn dispatcher(&self) -> Duration {
        Duration::from_millis(self.dispatcher_ms)
    }
    pub fn color(&self) -> Duration {
        Duration::from_millis(self.color_ms)
    }
    pub fn touch(&self) -> Duration {
        Duration::from_millis(self.touch_ms)
    }
    pub fn motor(&self) -> Duration {
        Duration::from_millis(self.motor_ms)
    }
    pub fn status_light(&self) -> Duration {
        Duration::from_millis(self.status_light_ms)
    }
    pub fn reporter(&self) -> Duration {
        Duration::from_millis(self.reporter_ms)
    }
}

/// Startup homing profile of one actuator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomingConfig {
    /// Direct-mode power used while seeking the reference.
    pub seek_power: i32,
    /// Relative move away from the reference once it is found.
    pub backoff_ticks: i32,
    /// Speed of position moves, as a percentage of the motor's max speed.
    pub speed_percent: i32,
}

/// A positional axis (rotation or elevation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Power applied for [`AxisCommand::Forward`][crate::AxisCommand::Forward].
    pub forward_power: i32,
    /// Power applied for [`AxisCommand::Reverse`][crate::AxisCommand::Reverse].
    pub reverse_power: i32,
    /// Relative move performed when the axis' limit flag is raised.
    pub correction_ticks: i32,
    /// Unsensed absolute bound; crossing it sends the axis back to zero.
    pub bound: TravelBound,
    pub homing: HomingConfig,
}

impl AxisConfig {
    pub fn rotation() -> Self {
        Self {
            forward_power: 30,
            reverse_power: -30,
            correction_ticks: -350,
            bound: TravelBound::Below(-400),
            homing: HomingConfig {
                seek_power: 30,
                backoff_ticks: -350,
                speed_percent: 40,
            },
        }
    }

    pub fn elevation() -> Self {
        Self {
            forward_power: -30,
            reverse_power: 20,
            correction_ticks: 100,
            bound: TravelBound::Above(200),
            homing: HomingConfig {
                seek_power: -30,
                backoff_ticks: 100,
                speed_percent: 20,
            },
        }
    }
}

/// The grip actuator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClawConfig {
    /// Direct-mode power used to close the claw.
    pub close_power: i32,
    /// How long closing power is applied before it is cut.
    pub close_dwell_ms: u64,
    pub homing: HomingConfig,
}

impl Default for ClawConfig {
    fn default() -> Self {
        Self {
            close_power: -40,
            close_dwell_ms: 500,
            homing: HomingConfig {
                seek_power: -40,
                backoff_ticks: 90,
                speed_percent: 40,
            },
        }
    }
}

impl ClawConfig {
    pub fn close_dwell(&self) -> Duration {
        Duration::from_millis(self.close_dwell_ms)
    }
}

/// Sensor thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Reflection level at or above which the top limit is reached.
    pub reflection_limit: i32,
    /// Sample value of the touch switch when pressed.
    pub touch_active: i32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            reflection_limit: 30,
            touch_active: 1,
        }
    }
}

/// Motion-complete polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Pause after issuing a position command before the first status poll.
    pub settle_ms: u64,
    pub poll_interval_ms: u64,
    /// Upper bound on a single position move.
    pub timeout_ms: u64,
    /// Upper bound on the reference-seeking phase of calibration.
    pub homing_timeout_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            settle_ms: 2,
            poll_interval_ms: 1,
            timeout_ms: 10_000,
            homing_timeout_ms: 30_000,
        }
    }
}

impl MotionConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
    pub fn homing_timeout(&self) -> Duration {
        Duration::from_millis(self.homing_timeout_ms)
    }
}

/// Real-time scheduling switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Run every task under SCHED_FIFO with its declared priority.
    pub realtime: bool,
    /// Treat a failure to obtain real-time priority as fatal.
    pub require_realtime: bool,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            realtime: true,
            require_realtime: false,
        }
    }
}

/// Layout of the reporter screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: String,
    pub title_x: i32,
    pub title_y: i32,
    pub width: i32,
    pub height: i32,
    pub circle_radius: i32,
    pub time_x: i32,
    /// Distance of the clock line from the bottom edge.
    pub time_margin_bottom: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "LEGO - ROBOTIC ARM".to_string(),
            title_x: 20,
            title_y: 10,
            width: 178,
            height: 128,
            circle_radius: 35,
            time_x: 60,
            time_margin_bottom: 20,
        }
    }
}

impl DisplayConfig {
    pub fn circle_center(&self) -> (i32, i32) {
        (self.width / 2, self.height / 2)
    }

    pub fn time_origin(&self) -> (i32, i32) {
        (self.time_x, self.height - self.time_margin_bottom)
    }
}
