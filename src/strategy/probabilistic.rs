//! Probabilistic priority-change exploration (PCT-style): like
//! [`crate::strategy::priority::PriorityStrategy`], but with a small
//! per-step probability of demoting the currently favored operation,
//! biasing the search toward schedules that interleave at a bounded number
//! of points rather than only ever running one fixed total order.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// Layer 3: Internal module imports
use crate::strategy::traits::Strategy;
use crate::util::OperationId;

pub struct ProbabilisticStrategy {
    seed: u64,
    rng: SmallRng,
    priorities: HashMap<OperationId, u64>,
    next_demoted_priority: u64,
    change_probability: f64,
}

impl ProbabilisticStrategy {
    /// `change_probability` is the chance, at each scheduling step, that the
    /// operation about to run gets demoted to the lowest priority instead of
    /// being allowed to keep winning ties later.
    pub fn new(seed: u64, change_probability: f64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
            priorities: HashMap::new(),
            next_demoted_priority: u64::MAX,
            change_probability,
        }
    }

    fn priority_of(&mut self, op: OperationId) -> u64 {
        if let Some(p) = self.priorities.get(&op) {
            return *p;
        }
        let p = self.rng.gen_range(0..u64::MAX / 2);
        self.priorities.insert(op, p);
        p
    }
}

impl Strategy for ProbabilisticStrategy {
    fn name(&self) -> &'static str {
        "probabilistic"
    }

    fn new_iteration(&mut self, iteration: u64) -> bool {
        self.rng = SmallRng::seed_from_u64(self.seed.wrapping_add(iteration));
        self.priorities.clear();
        self.next_demoted_priority = u64::MAX;
        true
    }

    fn next_operation(&mut self, enabled: &[OperationId], _step: u64) -> OperationId {
        let mut best = enabled[0];
        let mut best_priority = self.priority_of(best);
        for &op in &enabled[1..] {
            let p = self.priority_of(op);
            if p < best_priority {
                best = op;
                best_priority = p;
            }
        }

        if self.rng.gen_bool(self.change_probability) {
            self.priorities.insert(best, self.next_demoted_priority);
            self.next_demoted_priority = self.next_demoted_priority.saturating_sub(1);
        }

        best
    }

    fn next_boolean(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn next_integer(&mut self, max: u64) -> u64 {
        self.rng.gen_range(0..max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demotion_lets_a_runner_up_win_a_later_step() {
        let a = OperationId::new();
        let b = OperationId::new();
        let mut strategy = ProbabilisticStrategy::new(1, 1.0);
        strategy.new_iteration(0);

        let first = strategy.next_operation(&[a, b], 0);
        let second = strategy.next_operation(&[a, b], 1);
        assert_ne!(first, second);
    }
}
