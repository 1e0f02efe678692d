//! Indicator tasks: the status LEDs and the screen reporter.
//!
//! Both are read-only consumers of the shared registers.

use std::sync::Arc;
use std::time::Duration;

use armctl_hal::{LedChannel, LedSide, Screen, StatusLights};
use armctl_kernel::{SharedControlState, run_periodic};
use armctl_types::ArmError;
use armctl_types::config::DisplayConfig;
use tracing::debug;

const FULL: u8 = 255;
const OFF: u8 = 0;

/// Shows red on both LEDs while any correction is running, green otherwise.
pub struct StatusLight {
    lights: Box<dyn StatusLights>,
    state: Arc<SharedControlState>,
    shown: Option<bool>,
}

impl StatusLight {
    pub fn new(lights: Box<dyn StatusLights>, state: Arc<SharedControlState>) -> Self {
        Self {
            lights,
            state,
            shown: None,
        }
    }

    /// Repaint only on an edge of CorrectionInProgress.  The first cycle
    /// always paints.
    ///
    /// Returns whether the LEDs were written.
    pub fn step(&mut self) -> Result<bool, ArmError> {
        let correcting = self.state.correction_in_progress();
        if self.shown == Some(correcting) {
            return Ok(false);
        }
        let (red, green) = if correcting { (FULL, OFF) } else { (OFF, FULL) };
        for side in [LedSide::Left, LedSide::Right] {
            self.lights.set_indicator(side, LedChannel::Red, red)?;
            self.lights.set_indicator(side, LedChannel::Green, green)?;
        }
        debug!(correcting, "status light repainted");
        self.shown = Some(correcting);
        Ok(true)
    }

    pub fn run(mut self, period: Duration) -> Result<(), ArmError> {
        let state = self.state.clone();
        run_periodic("status-light", period, &state, || self.step().map(|_| ()))
    }
}

/// Source of the `HH:MM:SS` string shown on the screen.
pub type Clock = Box<dyn Fn() -> String + Send>;

/// Local wall-clock time as `HH:MM:SS`.
pub fn local_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Redraws the title, the claw-used circle and the clock every period.
pub struct Reporter {
    screen: Box<dyn Screen>,
    layout: DisplayConfig,
    state: Arc<SharedControlState>,
    clock: Clock,
}

impl Reporter {
    pub fn new(screen: Box<dyn Screen>, layout: DisplayConfig, state: Arc<SharedControlState>) -> Self {
        Self::with_clock(screen, layout, state, Box::new(local_time))
    }

    pub fn with_clock(
        screen: Box<dyn Screen>,
        layout: DisplayConfig,
        state: Arc<SharedControlState>,
        clock: Clock,
    ) -> Self {
        Self {
            screen,
            layout,
            state,
            clock,
        }
    }

    pub fn step(&mut self) -> Result<(), ArmError> {
        let claw_used = self.state.claw_used();
        let layout = &self.layout;

        self.screen.clear()?;
        self.screen
            .draw_text(layout.title_x, layout.title_y, &layout.title)?;
        let (cx, cy) = layout.circle_center();
        self.screen
            .draw_circle(cx, cy, layout.circle_radius, claw_used)?;
        let (tx, ty) = layout.time_origin();
        self.screen.draw_text(tx, ty, &(self.clock)())?;
        Ok(())
    }

    pub fn run(mut self, period: Duration) -> Result<(), ArmError> {
        let state = self.state.clone();
        run_periodic("reporter", period, &state, || self.step())
    }
}
