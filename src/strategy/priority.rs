//! Priority-based exploration: each operation gets a random priority the
//! first time it is seen; the scheduler always runs the enabled operation
//! with the best priority. Re-randomizing priorities every iteration
//! explores a different total order through the same program.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// Layer 3: Internal module imports
use crate::strategy::traits::Strategy;
use crate::util::OperationId;

pub struct PriorityStrategy {
    seed: u64,
    rng: SmallRng,
    priorities: HashMap<OperationId, u64>,
}

impl PriorityStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
            priorities: HashMap::new(),
        }
    }

    fn priority_of(&mut self, op: OperationId) -> u64 {
        if let Some(p) = self.priorities.get(&op) {
            return *p;
        }
        let p = self.rng.gen();
        self.priorities.insert(op, p);
        p
    }
}

impl Strategy for PriorityStrategy {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn new_iteration(&mut self, iteration: u64) -> bool {
        self.rng = SmallRng::seed_from_u64(self.seed.wrapping_add(iteration));
        self.priorities.clear();
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
    fn same_operation_keeps_its_priority_within_an_iteration() {
        let a = OperationId::new();
        let b = OperationId::new();
        let mut strategy = PriorityStrategy::new(5);
        strategy.new_iteration(0);

        let first = strategy.next_operation(&[a, b], 0);
        let second = strategy.next_operation(&[a, b], 1);
        assert_eq!(first, second);
    }
}
