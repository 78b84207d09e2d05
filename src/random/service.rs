//! `RandomnessService`: routes every "random" draw an actor makes through
//! the controlling Strategy during a test run, and through an ordinary
//! thread-local RNG outside of one.
//!
//! Grounded on the resource-pool's use of `rand` for non-deterministic pool
//! selection, split here into two modes so the exact same actor code runs
//! both under test and in a normal async binary.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use rand::Rng;

// Layer 3: Internal module imports
use crate::scheduler::Scheduler;
use crate::util::OperationId;

/// A source of "random" booleans and bounded integers. Actor code should
/// depend on this instead of calling into `rand` directly, so the same
/// logic is deterministic and replayable under the controlled scheduler.
pub enum RandomnessService {
    /// Every draw is resolved by the active iteration's Strategy and
    /// recorded in the trace.
    Controlled {
        scheduler: Arc<Scheduler>,
        operation: OperationId,
    },
    /// Draws come from the ambient thread-local RNG, for code running
    /// outside a test iteration.
    Production,
}

impl RandomnessService {
    pub fn controlled(scheduler: Arc<Scheduler>, operation: OperationId) -> Self {
        Self::Controlled {
            scheduler,
            operation,
        }
    }

    pub fn production() -> Self {
        Self::Production
    }

    pub fn next_boolean(&self) -> bool {
        match self {
            Self::Controlled {
                scheduler,
                operation,
            } => scheduler.next_boolean(*operation),
            Self::Production => rand::thread_rng().gen_bool(0.5),
        }
    }

    /// Draws an integer in `0..max`. `max` must be greater than zero.
    pub fn next_integer(&self, max: u64) -> u64 {
        match self {
            Self::Controlled {
                scheduler,
                operation,
            } => scheduler.next_integer(*operation, max),
            Self::Production => rand::thread_rng().gen_range(0..max),
        }
    }
}
