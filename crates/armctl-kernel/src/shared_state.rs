//! [`SharedControlState`] – the registers every control task communicates
//! through.
//!
//! Each logical group sits behind its own mutex so a sensor raising a limit
//! never contends with the dispatcher writing intents.  Every accessor is a
//! single scoped critical section over one field; callers never hold a lock
//! while talking to hardware because no guard ever escapes this module.
//!
//! | Register | Written by | Read by |
//! |---|---|---|
//! | intents | input dispatcher (claw: also claw controller) | controllers |
//! | clockwise / top limit | limit monitors (raise), owning controller (clear) | controllers |
//! | correction in progress | correcting controller | indicators |
//! | shutdown requested | dispatcher, coordinator, failing tasks | every task |
//! | claw used | claw controller | reporter |

use std::sync::{Mutex, MutexGuard};

use armctl_types::{ClawIntent, ElevationIntent, Intents, LimitKind, RotationIntent};
use tracing::{debug, info};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // The registers hold plain copies, so a value left behind by a panicking
    // writer is still a valid value.
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Mutex-guarded control registers shared by all tasks of one session.
#[derive(Debug, Default)]
pub struct SharedControlState {
    intents: Mutex<Intents>,
    clockwise_limit: Mutex<bool>,
    top_limit: Mutex<bool>,
    correction: Mutex<bool>,
    shutdown: Mutex<bool>,
    claw_used: Mutex<bool>,
}

impl SharedControlState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── intents ─────────────────────────────────────────────────────────────

    /// Snapshot of all three intents.
    pub fn intents(&self) -> Intents {
        *lock(&self.intents)
    }

    pub fn rotation_intent(&self) -> RotationIntent {
        lock(&self.intents).rotation
    }

    pub fn elevation_intent(&self) -> ElevationIntent {
        lock(&self.intents).elevation
    }

    pub fn claw_intent(&self) -> ClawIntent {
        lock(&self.intents).claw
    }

    pub fn set_rotation_intent(&self, intent: RotationIntent) {
        lock(&self.intents).rotation = intent;
    }

    pub fn set_elevation_intent(&self, intent: ElevationIntent) {
        lock(&self.intents).elevation = intent;
    }

    pub fn set_claw_intent(&self, intent: ClawIntent) {
        lock(&self.intents).claw = intent;
    }

    /// Write both axis intents in one critical section.
    pub fn set_axis_intents(&self, rotation: RotationIntent, elevation: ElevationIntent) {
        let mut intents = lock(&self.intents);
        intents.rotation = rotation;
        intents.elevation = elevation;
    }

    /// Return the claw intent and reset it to [`ClawIntent::Inactive`].
    pub fn take_claw_intent(&self) -> ClawIntent {
        std::mem::take(&mut lock(&self.intents).claw)
    }

    // ── limit flags ─────────────────────────────────────────────────────────

    fn limit_register(&self, kind: LimitKind) -> &Mutex<bool> {
        match kind {
            LimitKind::Clockwise => &self.clockwise_limit,
            LimitKind::Top => &self.top_limit,
        }
    }

    pub fn limit(&self, kind: LimitKind) -> bool {
        *lock(self.limit_register(kind))
    }

    /// Latch `kind`.  Returns `true` if the flag was previously clear.
    pub fn raise_limit(&self, kind: LimitKind) -> bool {
        let mut flag = lock(self.limit_register(kind));
        let was_clear = !*flag;
        *flag = true;
        was_clear
    }

    /// Clear `kind`.  Only the controller owning the limit calls this, after
    /// its correction has completed.
    pub fn clear_limit(&self, kind: LimitKind) {
        *lock(self.limit_register(kind)) = false;
    }

    // ── correction in progress ──────────────────────────────────────────────

    pub fn correction_in_progress(&self) -> bool {
        *lock(&self.correction)
    }

    pub fn set_correction(&self, active: bool) {
        *lock(&self.correction) = active;
    }

    /// Mark a correction as running until the returned guard drops.
    pub fn begin_correction(&self) -> CorrectionGuard<'_> {
        self.set_correction(true);
        CorrectionGuard { state: self }
    }

    // ── shutdown ────────────────────────────────────────────────────────────

    pub fn shutdown_requested(&self) -> bool {
        *lock(&self.shutdown)
    }

    /// Latch the shutdown flag.  There is no way to clear it again.
    pub fn request_shutdown(&self) {
        let mut flag = lock(&self.shutdown);
        if !*flag {
            *flag = true;
            info!("shutdown requested");
        }
    }

    // ── claw used ───────────────────────────────────────────────────────────

    pub fn claw_used(&self) -> bool {
        *lock(&self.claw_used)
    }

    pub fn set_claw_used(&self, used: bool) {
        let mut flag = lock(&self.claw_used);
        if *flag != used {
            debug!(used, "claw used changed");
        }
        *flag = used;
    }
}

/// Holds CorrectionInProgress set; clears it on drop, including on an early
/// `?` return from a failed correction.
#[must_use = "the correction flag is cleared as soon as the guard drops"]
pub struct CorrectionGuard<'a> {
    state: &'a SharedControlState,
}

impl Drop for CorrectionGuard<'_> {
    fn drop(&mut self) {
        self.state.set_correction(false);
    }
}
