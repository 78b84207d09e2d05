//! The `Strategy` trait: the pluggable oracle the scheduler asks for every
//! choice it would otherwise leave to the OS or a PRNG.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::util::OperationId;

/// Decides operation order and resolves every controlled-random draw for
/// one test run.
///
/// A `Strategy` instance lives across every iteration of a run (not just
/// one), so it can remember what it has already explored — the DFS strategy
/// uses this to backtrack systematically; the random strategy does not need
/// to but still gets a fresh seed derivation each iteration via
/// [`Strategy::new_iteration`].
pub trait Strategy: Send {
    /// Stable name, recorded in the trace header.
    fn name(&self) -> &'static str;

    /// Called once before each iteration starts. Returning `false` ends the
    /// run: there is nothing left to explore (the DFS strategy uses this
    /// once its search tree is exhausted; every other strategy always
    /// returns `true` and relies on the iteration-count bound instead).
    fn new_iteration(&mut self, iteration: u64) -> bool;

    /// Picks the next operation to run out of the enabled set. `enabled` is
    /// never empty — the scheduler checks for deadlock before calling this.
    fn next_operation(&mut self, enabled: &[OperationId], step: u64) -> OperationId;

    /// Resolves a controlled boolean draw.
    fn next_boolean(&mut self) -> bool;

    /// Resolves a controlled integer draw in `0..max` (`max` must be > 0).
    fn next_integer(&mut self, max: u64) -> u64;
}
