//! Drift-free periodic execution.
//!
//! A [`PeriodicTimer`] schedules wake-ups at `t0 + k·P`.  The next deadline
//! is always the previous deadline plus the period, never "now plus the
//! period", so jitter in one cycle does not accumulate into the next.  A
//! cycle that overruns its deadline is not fatal: the next wait returns
//! immediately and the schedule carries on from the missed deadline without
//! skipping any.

use std::thread;
use std::time::{Duration, Instant};

use armctl_types::ArmError;
use tracing::debug;

use crate::shared_state::SharedControlState;

/// Absolute-deadline timer for one periodic task.
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    period: Duration,
    next: Instant,
    overruns: u64,
}

impl PeriodicTimer {
    /// Start a schedule whose first deadline is `period` from now.
    pub fn new(period: Duration) -> Self {
        Self::starting_at(Instant::now(), period)
    }

    /// Start a schedule anchored at `t0`; the first deadline is `t0 + period`.
    pub fn starting_at(t0: Instant, period: Duration) -> Self {
        Self {
            period,
            next: t0 + period,
            overruns: 0,
        }
    }

    /// The deadline the next [`wait`](Self::wait) sleeps until.
    pub fn next_deadline(&self) -> Instant {
        self.next
    }

    /// Number of deadlines that had already passed when waited on.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Sleep until the next deadline, then advance it by one period.
    ///
    /// Returns `true` when the deadline had already passed on entry.
    pub fn wait(&mut self) -> bool {
        let now = Instant::now();
        let missed = now >= self.next;
        if missed {
            self.overruns += 1;
            debug!(
                late_us = now.duration_since(self.next).as_micros() as u64,
                overruns = self.overruns,
                "deadline overrun"
            );
        } else {
            thread::sleep(self.next - now);
        }
        self.next += self.period;
        missed
    }
}

/// Run `body` every `period` until shutdown is requested.
///
/// The shutdown flag is checked before each invocation, so a body that is in
/// the middle of a correction finishes it before the task exits.  The first
/// error returned by `body` ends the loop and is returned to the caller.
pub fn run_periodic<F>(
    name: &str,
    period: Duration,
    state: &SharedControlState,
    mut body: F,
) -> Result<(), ArmError>
where
    F: FnMut() -> Result<(), ArmError>,
{
    let mut timer = PeriodicTimer::new(period);
    let mut cycles: u64 = 0;
    while !state.shutdown_requested() {
        body()?;
        cycles += 1;
        timer.wait();
    }
    debug!(task = name, cycles, overruns = timer.overruns(), "periodic task stopped");
    Ok(())
}
