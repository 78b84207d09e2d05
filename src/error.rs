//! Crate-wide error type, aggregating the scheduler's iteration-level
//! errors with the I/O and serialization failures that only show up on the
//! trace/report read-write paths.
//!
//! Grounded on `supervisor::error::SupervisorError` and
//! `broker::error::BrokerError`'s pattern of a single `thiserror` enum with
//! structured, non-stringly-typed variants.

// Layer 1: Standard library imports
use std::path::PathBuf;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::scheduler::SchedulerError;

/// Top-level error type for code outside an iteration's own dispatch loops:
/// the CLI, trace/coverage file I/O, and the test engine's own setup
/// errors.
#[derive(Debug, Error)]
pub enum VigilError {
    /// An iteration ended with a confirmed bug or a configuration-level
    /// failure.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// Reading or writing a trace/coverage artifact failed at the
    /// filesystem level.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A trace or coverage file did not parse, or was written in a format
    /// version this build does not understand.
    #[error("failed to parse artifact at {path}: {source}")]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The trace file's format version does not match what this build
    /// writes.
    #[error("trace format mismatch: file is version {found}, this build writes version {expected}")]
    TraceVersionMismatch { found: u32, expected: u32 },

    /// No target was given, or the named target could not be resolved to
    /// a runnable test scenario.
    #[error("unknown test target: {0}")]
    UnknownTarget(String),
}

impl VigilError {
    /// Maps to the test-engine CLI's documented exit codes: 0 success
    /// (not an error), 1 bug found, 2 configuration error, 3 uncontrolled
    /// concurrency detected.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Scheduler(err) => {
                if matches!(err, SchedulerError::UncontrolledInvocation { .. }) {
                    3
                } else if err.is_configuration_error() {
                    2
                } else {
                    1
                }
            }
            Self::Io { .. }
            | Self::Serde { .. }
            | Self::TraceVersionMismatch { .. }
            | Self::UnknownTarget(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncontrolled_invocation_maps_to_exit_code_three() {
        let err = VigilError::Scheduler(SchedulerError::UncontrolledInvocation {
            operation: crate::util::OperationId::new(),
            method: "std::thread::spawn",
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn replay_divergence_maps_to_exit_code_two() {
        let err = VigilError::Scheduler(SchedulerError::ReplayDivergence {
            step: 4,
            recorded: crate::util::OperationId::new(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn deadlock_maps_to_exit_code_one() {
        let err = VigilError::Scheduler(SchedulerError::Deadlock {
            paused_operations: vec![crate::util::OperationId::new()],
        });
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn unknown_target_maps_to_exit_code_two() {
        let err = VigilError::UnknownTarget("missing_scenario".to_string());
        assert_eq!(err.exit_code(), 2);
    }
}
