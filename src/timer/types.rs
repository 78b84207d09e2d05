//! Handles and info records for logical timers.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::util::{ActorId, TimerId};

/// A handle to a timer started via [`crate::timer::TimerService::start_timer`].
/// Dropping this handle does not stop the timer; call
/// [`crate::timer::TimerService::stop_timer`] explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub timer_id: TimerId,
}

/// Static information about an armed timer, kept for diagnostics and for
/// `stop_timer` to locate its owner.
#[derive(Debug, Clone)]
pub struct TimerInfo {
    pub timer_id: TimerId,
    pub owner: ActorId,
    pub periodic: bool,
}
