//! `TestConfig`: the knobs one exploration run is configured with.
//!
//! Grounded on `system::config::SystemConfig`'s "plain struct with a
//! `Default` impl plus `with_*` builder methods" shape.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::strategy::StrategyKind;

/// Configuration for one call to [`crate::test_engine::TestEngine::run`].
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub strategy: StrategyKind,
    pub seed: u64,
    pub iterations: u64,
    pub max_steps: u64,
    pub liveness_threshold: u64,
    pub fail_on_first: bool,
}

impl TestConfig {
    /// Starts from the defaults, exploring with `strategy`.
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_liveness_threshold(mut self, threshold: u64) -> Self {
        self.liveness_threshold = threshold;
        self
    }

    pub fn with_fail_on_first(mut self, fail_on_first: bool) -> Self {
        self.fail_on_first = fail_on_first;
        self
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Random,
            seed: 1,
            iterations: 100,
            max_steps: 10_000,
            liveness_threshold: 10_000,
            fail_on_first: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods_override_defaults() {
        let config = TestConfig::new(StrategyKind::Dfs)
            .with_seed(7)
            .with_iterations(5)
            .with_max_steps(200)
            .with_fail_on_first(false);

        assert_eq!(config.strategy, StrategyKind::Dfs);
        assert_eq!(config.seed, 7);
        assert_eq!(config.iterations, 5);
        assert_eq!(config.max_steps, 200);
        assert!(!config.fail_on_first);
    }
}
