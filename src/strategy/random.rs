//! Uniform random exploration: picks uniformly among the enabled set and
//! answers controlled-random draws from the same seeded generator.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// Layer 3: Internal module imports
use crate::strategy::traits::Strategy;
use crate::util::OperationId;

/// The baseline strategy: every enabled operation has equal probability of
/// being chosen at every step.
pub struct RandomStrategy {
    seed: u64,
    rng: SmallRng,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn new_iteration(&mut self, iteration: u64) -> bool {
        self.rng = SmallRng::seed_from_u64(self.seed.wrapping_add(iteration));
        true
    }

    fn next_operation(&mut self, enabled: &[OperationId], _step: u64) -> OperationId {
        let index = self.rng.gen_range(0..enabled.len());
        enabled[index]
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
    fn same_seed_same_iteration_picks_same_operation() {
        let a = OperationId::new();
        let b = OperationId::new();
        let enabled = [a, b];

        let mut s1 = RandomStrategy::new(99);
        s1.new_iteration(0);
        let mut s2 = RandomStrategy::new(99);
        s2.new_iteration(0);

        assert_eq!(
            s1.next_operation(&enabled, 0),
            s2.next_operation(&enabled, 0)
        );
    }

    #[test]
    fn single_enabled_operation_is_always_picked() {
        let only = OperationId::new();
        let mut strategy = RandomStrategy::new(1);
        strategy.new_iteration(0);
        assert_eq!(strategy.next_operation(&[only], 0), only);
    }
}
