//! The hot/cold temperature model liveness monitors are checked against.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::Serialize;

// Layer 3: Internal module imports
use crate::util::MonitorId;

/// Classification of a monitor state for liveness checking.
///
/// A monitor spends most of its life in `Neutral` states. Entering a `Hot`
/// state starts a clock: if the schedule stays fair without ever reaching a
/// `Cold` state (or leaving the hot state) within the configured threshold,
/// the run is a liveness bug — the program promised eventual progress and
/// didn't deliver it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StateTemperature {
    Hot,
    Cold,
    Neutral,
}

/// A confirmed liveness violation: a monitor stayed hot across more fair
/// scheduling steps than its threshold allows.
#[derive(Debug, Clone, Serialize)]
pub struct LivenessViolation {
    pub monitor: MonitorId,
    pub monitor_name: &'static str,
    pub state: &'static str,
    pub hot_steps: u64,
    pub threshold: u64,
}

/// A safety assertion raised synchronously from inside a monitor's event
/// handler — ends the iteration immediately, unlike a liveness violation
/// which only surfaces at a fair-cycle boundary.
#[derive(Debug, Clone, Serialize)]
pub struct SafetyViolation {
    pub monitor: MonitorId,
    pub monitor_name: &'static str,
    pub message: String,
}

/// Either way a monitor can fail a run.
#[derive(Debug, Clone, Serialize)]
pub enum MonitorViolation {
    Safety(SafetyViolation),
    Liveness(LivenessViolation),
}
