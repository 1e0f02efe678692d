//! Translating declared priority layers into SCHED_FIFO priorities.
//!
//! Priorities are never written as raw numbers at a call site.  A task
//! declares its [`SchedulingClass`] and [`apply_priority`] maps it to
//! `max − offset` for the calling thread, once, at task start.

use armctl_types::config::SchedulingConfig;
use armctl_types::{ArmError, SchedulingClass};
use tracing::{debug, warn};

/// What [`apply_priority`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityOutcome {
    /// The thread now runs under SCHED_FIFO at this priority.
    Applied(i32),
    /// Real-time scheduling is disabled in the configuration.
    Disabled,
    /// The request was refused; the thread keeps default scheduling.
    Fallback,
}

/// Give the calling thread the real-time priority of `class`.
///
/// # Errors
///
/// Returns [`ArmError::Scheduling`] when the priority cannot be applied and
/// `config.require_realtime` is set.  Without that flag a refusal is logged at
/// `warn` and the thread carries on with default scheduling.
pub fn apply_priority<C: SchedulingClass>(
    class: C,
    config: &SchedulingConfig,
) -> Result<PriorityOutcome, ArmError> {
    if !config.realtime {
        return Ok(PriorityOutcome::Disabled);
    }
    match set_fifo_priority(class.offset_below_max()) {
        Ok(priority) => {
            debug!(?class, priority, "real-time priority applied");
            Ok(PriorityOutcome::Applied(priority))
        }
        Err(reason) if config.require_realtime => Err(ArmError::Scheduling(format!(
            "cannot apply {class:?} priority: {reason}"
        ))),
        Err(reason) => {
            warn!(?class, %reason, "real-time priority unavailable, using default scheduling");
            Ok(PriorityOutcome::Fallback)
        }
    }
}

/// Priority `offset` below the SCHED_FIFO maximum, clamped to the minimum.
#[cfg(target_os = "linux")]
fn fifo_priority(offset: i32) -> Result<i32, String> {
    // SAFETY: plain queries with no pointer arguments.
    let (max, min) = unsafe {
        (
            libc::sched_get_priority_max(libc::SCHED_FIFO),
            libc::sched_get_priority_min(libc::SCHED_FIFO),
        )
    };
    if max < 0 || min < 0 {
        return Err(std::io::Error::last_os_error().to_string());
    }
    Ok((max - offset).max(min))
}

#[cfg(target_os = "linux")]
fn set_fifo_priority(offset: i32) -> Result<i32, String> {
    let priority = fifo_priority(offset)?;
    // SAFETY: sched_param is a plain C struct; zeroed is a valid value and
    // the pointer passed below outlives the call.
    let rc = unsafe {
        let mut param: libc::sched_param = std::mem::zeroed();
        param.sched_priority = priority;
        libc::pthread_setschedparam(libc::pthread_self(), libc::SCHED_FIFO, &param)
    };
    if rc == 0 {
        Ok(priority)
    } else {
        Err(std::io::Error::from_raw_os_error(rc).to_string())
    }
}

#[cfg(not(target_os = "linux"))]
fn set_fifo_priority(_offset: i32) -> Result<i32, String> {
    Err("SCHED_FIFO is only supported on Linux".to_string())
}
