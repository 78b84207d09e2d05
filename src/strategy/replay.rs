//! Deterministic replay of a previously recorded [`Trace`]: answers every
//! choice exactly as recorded, raising divergence the instant the live
//! enabled set doesn't contain the recorded choice.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::report::Trace;
use crate::strategy::traits::Strategy;
use crate::util::OperationId;

/// Replays a recorded trace step for step. A divergence is recorded rather
/// than panicking, so the scheduler can turn it into a proper
/// [`crate::scheduler::SchedulerError::ReplayDivergence`].
pub struct ReplayStrategy {
    records: Vec<(OperationId, Option<u64>)>,
    cursor: usize,
    diverged_at: Option<u64>,
}

impl ReplayStrategy {
    pub fn from_trace(trace: &Trace) -> Self {
        let records = trace
            .records()
            .iter()
            .map(|r| (r.op_id, r.random_bits))
            .collect();
        Self {
            records,
            cursor: 0,
            diverged_at: None,
        }
    }

    /// The step at which the live schedule stopped matching the recording,
    /// if any.
    pub fn diverged_at(&self) -> Option<u64> {
        self.diverged_at
    }
}

impl Strategy for ReplayStrategy {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn new_iteration(&mut self, iteration: u64) -> bool {
        // A replay run is exactly one iteration.
        iteration == 0
    }

    fn next_operation(&mut self, enabled: &[OperationId], step: u64) -> OperationId {
        let Some((recorded, _)) = self.records.get(self.cursor).copied() else {
            self.diverged_at = Some(step);
            return enabled[0];
        };
        self.cursor += 1;
        if !enabled.contains(&recorded) {
            self.diverged_at = Some(step);
            return enabled[0];
        }
        recorded
    }

    fn next_boolean(&mut self) -> bool {
        self.next_integer(2) == 1
    }

    fn next_integer(&mut self, max: u64) -> u64 {
        let bits = self
            .records
            .get(self.cursor.saturating_sub(1))
            .and_then(|(_, bits)| *bits)
            .unwrap_or(0);
        bits % max.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{TraceHeader, TraceRecord};

    #[test]
    fn replays_recorded_choice_when_present_in_enabled_set() {
        let a = OperationId::new();
        let b = OperationId::new();

        let mut trace = Trace::new(TraceHeader::new("replay", 1, 100));
        trace.push(TraceRecord {
            step: 0,
            op_id: b,
            random_bits: None,
        });

        let mut strategy = ReplayStrategy::from_trace(&trace);
        let picked = strategy.next_operation(&[a, b], 0);
        assert_eq!(picked, b);
        assert!(strategy.diverged_at().is_none());
    }

    #[test]
    fn flags_divergence_when_recorded_choice_is_not_enabled() {
        let a = OperationId::new();
        let recorded = OperationId::new();

        let mut trace = Trace::new(TraceHeader::new("replay", 1, 100));
        trace.push(TraceRecord {
            step: 0,
            op_id: recorded,
            random_bits: None,
        });

        let mut strategy = ReplayStrategy::from_trace(&trace);
        strategy.next_operation(&[a], 0);
        assert_eq!(strategy.diverged_at(), Some(0));
    }
}
