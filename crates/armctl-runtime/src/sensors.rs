//! Limit monitors: periodic sensor sampling that latches a limit flag.
//!
//! A monitor only ever raises its flag.  Clearing is the owning controller's
//! job once its correction has completed, so a sample that drops back below
//! the threshold mid-correction changes nothing.

use std::sync::Arc;
use std::time::Duration;

use armctl_hal::Sensor;
use armctl_kernel::{SharedControlState, run_periodic};
use armctl_types::config::SensorConfig;
use armctl_types::{ArmError, LimitKind, SensorMode};
use tracing::info;

/// Condition a sample must meet to count as "limit reached".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    AtLeast(i32),
    Equals(i32),
}

impl Threshold {
    pub fn is_met(self, sample: i32) -> bool {
        match self {
            Threshold::AtLeast(limit) => sample >= limit,
            Threshold::Equals(value) => sample == value,
        }
    }
}

/// Samples one sensor and raises one limit flag.
pub struct LimitMonitor {
    sensor: Box<dyn Sensor>,
    kind: LimitKind,
    threshold: Threshold,
    state: Arc<SharedControlState>,
    tripped: bool,
}

impl LimitMonitor {
    pub fn new(
        sensor: Box<dyn Sensor>,
        kind: LimitKind,
        threshold: Threshold,
        state: Arc<SharedControlState>,
    ) -> Self {
        Self {
            sensor,
            kind,
            threshold,
            state,
            tripped: false,
        }
    }

    /// Color sensor watching the top limit; switches the sensor to
    /// reflected-light mode.
    pub fn reflection(
        mut sensor: Box<dyn Sensor>,
        config: &SensorConfig,
        state: Arc<SharedControlState>,
    ) -> Result<Self, ArmError> {
        sensor.set_mode(SensorMode::Reflect)?;
        Ok(Self::new(
            sensor,
            LimitKind::Top,
            Threshold::AtLeast(config.reflection_limit),
            state,
        ))
    }

    /// Touch switch watching the clockwise limit.
    pub fn touch(
        sensor: Box<dyn Sensor>,
        config: &SensorConfig,
        state: Arc<SharedControlState>,
    ) -> Self {
        Self::new(
            sensor,
            LimitKind::Clockwise,
            Threshold::Equals(config.touch_active),
            state,
        )
    }

    pub fn kind(&self) -> LimitKind {
        self.kind
    }

    /// Take one sample, raising the flag when the threshold is met.
    ///
    /// Returns whether this sample met the threshold.
    pub fn step(&mut self) -> Result<bool, ArmError> {
        let sample = self.sensor.sample()?;
        let met = self.threshold.is_met(sample);
        if met {
            self.state.raise_limit(self.kind);
            if !self.tripped {
                info!(limit = self.kind.name(), sample, "limit reached");
            }
        }
        self.tripped = met;
        Ok(met)
    }

    /// Sample every `period` until shutdown.
    pub fn run(mut self, period: Duration) -> Result<(), ArmError> {
        let state = self.state.clone();
        run_periodic(self.kind.name(), period, &state, || self.step().map(|_| ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockSensor {
        samples: Vec<i32>,
        next: usize,
        mode: Option<SensorMode>,
    }

    impl MockSensor {
        fn new(samples: Vec<i32>) -> Self {
            Self {
                samples,
                next: 0,
                mode: None,
            }
        }
    }

    impl Sensor for MockSensor {
        fn id(&self) -> &str {
            "mock"
        }

        fn sample(&mut self) -> Result<i32, ArmError> {
            let i = self.next.min(self.samples.len() - 1);
            self.next += 1;
            Ok(self.samples[i])
        }

        fn set_mode(&mut self, mode: SensorMode) -> Result<(), ArmError> {
            if mode != SensorMode::Reflect {
                return Err(ArmError::fault("mock", "unexpected mode"));
            }
            self.mode = Some(mode);
            Ok(())
        }
    }

    struct FailingSensor;

    impl Sensor for FailingSensor {
        fn id(&self) -> &str {
            "color"
        }
        fn sample(&mut self) -> Result<i32, ArmError> {
            Err(ArmError::fault("color", "unplugged"))
        }
        fn set_mode(&mut self, _mode: SensorMode) -> Result<(), ArmError> {
            Ok(())
        }
    }

    #[test]
    fn reflection_raises_top_at_third_sample() {
        let state = Arc::new(SharedControlState::new());
        let sensor = MockSensor::new(vec![10, 15, 31, 40]);
        let mut monitor =
            LimitMonitor::reflection(Box::new(sensor), &SensorConfig::default(), state.clone())
                .unwrap();

        assert!(!monitor.step().unwrap());
        assert!(!state.limit(LimitKind::Top));
        assert!(!monitor.step().unwrap());
        assert!(!state.limit(LimitKind::Top));
        assert!(monitor.step().unwrap());
        assert!(state.limit(LimitKind::Top));
        assert!(monitor.step().unwrap());
        assert!(!state.limit(LimitKind::Clockwise));
    }

    #[test]
    fn monitor_never_clears_its_flag() {
        let state = Arc::new(SharedControlState::new());
        let sensor = MockSensor::new(vec![1, 0, 0]);
        let mut monitor = LimitMonitor::touch(Box::new(sensor), &SensorConfig::default(), state.clone());

        monitor.step().unwrap();
        assert!(state.limit(LimitKind::Clockwise));
        monitor.step().unwrap();
        monitor.step().unwrap();
        assert!(state.limit(LimitKind::Clockwise));
    }

    #[test]
    fn touch_requires_exact_active_value() {
        assert!(Threshold::Equals(1).is_met(1));
        assert!(!Threshold::Equals(1).is_met(2));
        assert!(Threshold::AtLeast(30).is_met(30));
        assert!(!Threshold::AtLeast(30).is_met(29));
    }

    #[test]
    fn sensor_fault_ends_the_task() {
        let state = Arc::new(SharedControlState::new());
        let monitor = LimitMonitor::new(
            Box::new(FailingSensor),
            LimitKind::Top,
            Threshold::AtLeast(30),
            state,
        );
        let err = monitor.run(Duration::from_millis(1)).unwrap_err();
        assert!(matches!(err, ArmError::CapabilityFault { .. }));
    }

    #[test]
    fn run_exits_on_shutdown() {
        let state = Arc::new(SharedControlState::new());
        state.request_shutdown();
        let monitor = LimitMonitor::touch(
            Box::new(MockSensor::new(vec![1])),
            &SensorConfig::default(),
            state.clone(),
        );
        monitor.run(Duration::from_millis(1)).unwrap();
        assert!(!state.limit(LimitKind::Clockwise));
    }
}
