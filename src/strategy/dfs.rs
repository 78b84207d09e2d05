//! Systematic exhaustive exploration via depth-first backtracking over the
//! decision tree of operation choices — the classic state-space search
//! shape (reference DFS schedulers for concurrency testing), adapted to
//! operate over `OperationId` choices instead of thread ids.
//!
//! Unlike the randomized strategies, a single `DfsStrategy` instance must
//! survive across the whole run: each iteration explores one path through
//! the tree, and [`Strategy::new_iteration`] backtracks to the next
//! unexplored branch. The run ends (`new_iteration` returns `false`) once
//! every branch has been visited.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::strategy::traits::Strategy;
use crate::util::OperationId;

/// The lowest operation id in `enabled`, used to order sibling branches
/// deterministically. `enabled` is always non-empty when the scheduler
/// calls into a strategy.
fn lowest_of(enabled: &[OperationId]) -> OperationId {
    let mut lowest = enabled[0];
    for &op in &enabled[1..] {
        if op < lowest {
            lowest = op;
        }
    }
    lowest
}

#[derive(Clone)]
struct DfsNode {
    chosen: OperationId,
    untried: Vec<OperationId>,
}

pub struct DfsStrategy {
    /// The path the previous iteration took; backtracked in place to pick
    /// the next path to explore.
    path: Vec<DfsNode>,
    /// The path being built during the current iteration.
    building: Vec<DfsNode>,
    cursor: usize,
    started: bool,
    exhausted: bool,
}

impl DfsStrategy {
    pub fn new() -> Self {
        Self {
            path: Vec::new(),
            building: Vec::new(),
            cursor: 0,
            started: false,
            exhausted: false,
        }
    }
}

impl Default for DfsStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for DfsStrategy {
    fn name(&self) -> &'static str {
        "dfs"
    }

    fn new_iteration(&mut self, _iteration: u64) -> bool {
        if self.exhausted {
            return false;
        }
        if !self.started {
            self.started = true;
            self.cursor = 0;
            self.building = Vec::new();
            return true;
        }

        self.path = std::mem::take(&mut self.building);
        while let Some(last) = self.path.last() {
            if last.untried.is_empty() {
                self.path.pop();
            } else {
                break;
            }
        }
        if self.path.is_empty() {
            self.exhausted = true;
            return false;
        }
        if let Some(last) = self.path.last_mut() {
            if let Some(next_choice) = last.untried.pop() {
                last.chosen = next_choice;
            }
        }

        self.cursor = 0;
        self.building = Vec::new();
        true
    }

    fn next_operation(&mut self, enabled: &[OperationId], _step: u64) -> OperationId {
        if self.cursor < self.path.len() {
            // Replaying a decision from the backtracked path: keep its
            // remaining untried alternatives intact rather than
            // recomputing them, or already-tried branches would reappear.
            let node = self.path[self.cursor].clone();
            let chosen = if enabled.contains(&node.chosen) {
                node.chosen
            } else {
                lowest_of(enabled)
            };
            self.building.push(DfsNode {
                chosen,
                untried: node.untried,
            });
            self.cursor += 1;
            return chosen;
        }

        let chosen = lowest_of(enabled);
        let untried: Vec<OperationId> = enabled.iter().copied().filter(|&op| op != chosen).collect();
        self.building.push(DfsNode { chosen, untried });
        self.cursor += 1;
        chosen
    }

    fn next_boolean(&mut self) -> bool {
        self.next_integer(2) == 1
    }

    fn next_integer(&mut self, max: u64) -> u64 {
        // Controlled random draws are treated as a binary/`max`-ary choice
        // point in the same tree, keyed by a synthetic operation id would
        // require threading ids through; DFS over random draws is left to
        // the probabilistic strategies. Deterministic midpoint keeps replay
        // stable without expanding the search space explosively.
        max / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausts_every_branch_of_a_two_level_binary_tree() {
        let a = OperationId::new();
        let b = OperationId::new();
        let enabled = [a, b];

        let mut strategy = DfsStrategy::new();
        let mut schedules = Vec::new();
        let mut iteration = 0;
        while strategy.new_iteration(iteration) {
            let first = strategy.next_operation(&enabled, 0);
            let second = strategy.next_operation(&enabled, 1);
            schedules.push((first, second));
            iteration += 1;
            if iteration > 10 {
                break;
            }
        }

        assert_eq!(schedules.len(), 4, "expected all 4 branches of a 2x2 tree");
    }
}
