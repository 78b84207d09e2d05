//! Pluggable exploration strategies: the scheduler defers every
//! operation pick and controlled-random draw to whichever [`Strategy`] the
//! test run was configured with.

pub mod dfs;
pub mod priority;
pub mod probabilistic;
pub mod random;
pub mod replay;
pub mod schedule;
pub mod traits;

pub use dfs::DfsStrategy;
pub use priority::PriorityStrategy;
pub use probabilistic::ProbabilisticStrategy;
pub use random::RandomStrategy;
pub use replay::ReplayStrategy;
pub use schedule::{Schedule, ScheduleStep};
pub use traits::Strategy;

/// The closed set of built-in strategies, selectable from the CLI/config
/// without reaching for a trait object constructor by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Random,
    Probabilistic,
    Priority,
    Dfs,
}

impl StrategyKind {
    pub fn build(self, seed: u64) -> Box<dyn Strategy> {
        match self {
            Self::Random => Box::new(RandomStrategy::new(seed)),
            Self::Probabilistic => Box::new(ProbabilisticStrategy::new(seed, 0.1)),
            Self::Priority => Box::new(PriorityStrategy::new(seed)),
            Self::Dfs => Box::new(DfsStrategy::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Probabilistic => "probabilistic",
            Self::Priority => "priority",
            Self::Dfs => "dfs",
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "probabilistic" => Ok(Self::Probabilistic),
            "priority" => Ok(Self::Priority),
            "dfs" => Ok(Self::Dfs),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}
