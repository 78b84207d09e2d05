//! Errors the scheduler surfaces, grounded on the `thiserror`-enum idiom in
//! `airssys-rt`'s `supervisor::error` and `mailbox::traits::MailboxError`.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::util::OperationId;

/// Everything that can end a test iteration, whether as a found bug or as
/// an inconclusive/configuration-level stop.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulerError {
    /// The enabled set was empty while at least one operation remained
    /// paused on a dependency no send or timer in the current schedule can
    /// satisfy.
    #[error("deadlock: {} operation(s) paused with no enabled successor", .paused_operations.len())]
    Deadlock { paused_operations: Vec<OperationId> },

    /// `max_steps` scheduling decisions were made without the iteration
    /// completing. Not a bug — the iteration ends inconclusively.
    #[error("step bound of {max_steps} reached")]
    StepBoundExceeded { max_steps: u64 },

    /// User code reached an unrewritten concurrency primitive; the
    /// scheduler can no longer guarantee it owns every handoff.
    #[error("uncontrolled invocation from operation {operation}: {method}")]
    UncontrolledInvocation {
        operation: OperationId,
        method: &'static str,
    },

    /// A replay strategy's recorded operation id didn't match the live
    /// enabled set at the same step.
    #[error("replay divergence at step {step}: recorded {recorded}, live options did not include it")]
    ReplayDivergence { step: u64, recorded: OperationId },

    /// The iteration was cancelled (bug found elsewhere, step budget
    /// exceeded, or an external stop request); every live operation must
    /// unwind.
    #[error("iteration cancelled")]
    Cancelled,

    /// A handler raised more than one transition request, or a
    /// `receive`-predicate failed — surfaced as a user assertion bug.
    #[error("user assertion failed: {message}")]
    UserAssertionFailed { message: String },

    /// A monitor raised a synchronous safety assertion from inside
    /// `on_event`.
    #[error("monitor {monitor_name} safety violation: {message}")]
    MonitorSafetyViolation {
        monitor: crate::util::MonitorId,
        monitor_name: &'static str,
        message: String,
    },

    /// A monitor stayed in a hot state past its liveness threshold under a
    /// fair schedule.
    #[error("monitor {monitor_name} liveness violation: stuck in {state} for {hot_steps} fair steps (threshold {threshold})")]
    MonitorLivenessViolation {
        monitor: crate::util::MonitorId,
        monitor_name: &'static str,
        state: &'static str,
        hot_steps: u64,
        threshold: u64,
    },
}

impl SchedulerError {
    /// True for errors that represent an *inconclusive* stop rather than a
    /// found bug.
    pub fn is_inconclusive(&self) -> bool {
        matches!(self, Self::StepBoundExceeded { .. })
    }

    /// True for errors that are configuration-level failures rather than
    /// found bugs.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UncontrolledInvocation { .. } | Self::ReplayDivergence { .. }
        )
    }
}

impl From<crate::mailbox::MailboxError> for SchedulerError {
    fn from(err: crate::mailbox::MailboxError) -> Self {
        Self::UserAssertionFailed {
            message: err.to_string(),
        }
    }
}

impl From<crate::monitor::MonitorViolation> for SchedulerError {
    fn from(violation: crate::monitor::MonitorViolation) -> Self {
        match violation {
            crate::monitor::MonitorViolation::Safety(s) => Self::MonitorSafetyViolation {
                monitor: s.monitor,
                monitor_name: s.monitor_name,
                message: s.message,
            },
            crate::monitor::MonitorViolation::Liveness(l) => Self::MonitorLivenessViolation {
                monitor: l.monitor,
                monitor_name: l.monitor_name,
                state: l.state,
                hot_steps: l.hot_steps,
                threshold: l.threshold,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_bound_is_inconclusive_not_a_bug() {
        let err = SchedulerError::StepBoundExceeded { max_steps: 10 };
        assert!(err.is_inconclusive());
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn uncontrolled_invocation_is_configuration_error() {
        let err = SchedulerError::UncontrolledInvocation {
            operation: OperationId::new(),
            method: "thread::spawn",
        };
        assert!(err.is_configuration_error());
        assert!(!err.is_inconclusive());
    }

    #[test]
    fn deadlock_is_neither() {
        let err = SchedulerError::Deadlock {
            paused_operations: vec![OperationId::new(), OperationId::new()],
        };
        assert!(!err.is_inconclusive());
        assert!(!err.is_configuration_error());
    }
}
