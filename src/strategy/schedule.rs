//! `Schedule`: the sequence of choices a [`crate::strategy::Strategy`] made
//! (or is being asked to replay), grounded on the `Schedule`/`ScheduleStep`
//! shape used by reference DFS/replay schedulers for concurrency testing.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::util::OperationId;

/// One scheduling decision, either an operation pick or a controlled
/// random draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleStep {
    Operation(OperationId),
    Random(u64),
}

/// An ordered record of every choice made in one iteration. Used by
/// [`crate::strategy::dfs::DfsStrategy`] to identify which prefix of choices
/// it has already explored, and by [`crate::strategy::replay::ReplayStrategy`]
/// to check a recorded run against the live enabled set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    steps: Vec<ScheduleStep>,
}

impl Schedule {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn push(&mut self, step: ScheduleStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[ScheduleStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
