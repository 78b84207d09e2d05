//! `BugReport`: what a failed iteration hands back to the caller — the kind
//! of bug, where it happened, and the trace needed to reproduce it.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::Serialize;

// Layer 3: Internal module imports
use crate::monitor::{LivenessViolation, SafetyViolation};
use crate::report::trace::Trace;
use crate::util::OperationId;

/// Classification of a confirmed bug. `Deadlock` and
/// `UncontrolledInvocation`/`ReplayDivergence` are scheduler-level; the rest
/// come from user or monitor code.
#[derive(Debug, Clone, Serialize)]
pub enum BugKind {
    Deadlock {
        paused_operations: Vec<OperationId>,
    },
    UserAssertion {
        message: String,
    },
    SafetyViolation(SafetyViolation),
    LivenessViolation(LivenessViolation),
    UncontrolledInvocation {
        operation: OperationId,
        method: &'static str,
    },
    ReplayDivergence {
        step: u64,
        recorded: OperationId,
    },
}

/// A confirmed bug, with enough context to reproduce it via replay.
#[derive(Debug, Clone, Serialize)]
pub struct BugReport {
    pub kind: BugKind,
    pub iteration: u64,
    pub step: u64,
    pub trace: Trace,
}

impl BugReport {
    pub fn new(kind: BugKind, iteration: u64, step: u64, trace: Trace) -> Self {
        Self {
            kind,
            iteration,
            step,
            trace,
        }
    }

    /// True for bugs that represent a genuine correctness violation rather
    /// than a configuration mistake in the program under test.
    pub fn is_program_bug(&self) -> bool {
        !matches!(
            self.kind,
            BugKind::UncontrolledInvocation { .. } | BugKind::ReplayDivergence { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TraceHeader;

    #[test]
    fn configuration_errors_are_not_program_bugs() {
        let trace = Trace::new(TraceHeader::new("random", 1, 100));
        let report = BugReport::new(
            BugKind::UncontrolledInvocation {
                operation: OperationId::new(),
                method: "std::thread::spawn",
            },
            0,
            3,
            trace,
        );
        assert!(!report.is_program_bug());
    }

    #[test]
    fn deadlock_is_a_program_bug() {
        let trace = Trace::new(TraceHeader::new("random", 1, 100));
        let report = BugReport::new(
            BugKind::Deadlock {
                paused_operations: vec![OperationId::new()],
            },
            0,
            3,
            trace,
        );
        assert!(report.is_program_bug());
    }
}
