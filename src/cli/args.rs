//! Command-line surface for the `vigil` binary.
//!
//! Grounded on `airssys-wasm-cli`'s `Cli`/`Commands` clap-derive split —
//! one top-level parser, one subcommand per verb, each verb's flags living
//! in its own args struct.

// Layer 1: Standard library imports
use std::path::PathBuf;

// Layer 2: Third-party crate imports
use clap::{Parser, Subcommand};

// Layer 3: Internal module imports
use crate::strategy::StrategyKind;

#[derive(Debug, Parser)]
#[command(name = "vigil", version, about = "Systematic concurrency testing for actor and state-machine programs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log filter, e.g. `vigil=debug`. Falls back to `RUST_LOG` then `info`.
    #[arg(long, global = true)]
    pub log_filter: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Runs a scenario under a chosen exploration strategy for a number of
    /// iterations, stopping early on the first confirmed bug unless
    /// `--no-fail-on-first` is given.
    Test(TestArgs),

    /// Deterministically replays a trace file previously written by `test`
    /// against the same scenario, to confirm a bug reproduces.
    Replay(ReplayArgs),

    /// Lists the built-in scenarios this binary can run.
    List,
}

#[derive(Debug, Parser)]
pub struct TestArgs {
    /// Name of a built-in scenario (see `vigil list`).
    pub scenario: String,

    /// Exploration strategy: random, probabilistic, priority, or dfs.
    #[arg(long, default_value = "random")]
    pub strategy: StrategyKind,

    /// PRNG seed; the same seed plus the same strategy reproduces the same
    /// sequence of iterations.
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Number of iterations to run.
    #[arg(long, default_value_t = 100)]
    pub iterations: u64,

    /// Upper bound on scheduling steps per iteration, guarding against a
    /// program that never quiesces.
    #[arg(long, default_value_t = 10_000)]
    pub max_steps: u64,

    /// Consecutive fair steps a monitor may stay hot before its run is
    /// flagged as a liveness violation.
    #[arg(long, default_value_t = 10_000)]
    pub liveness_threshold: u64,

    /// Keep running the remaining iterations even after a bug is confirmed.
    #[arg(long)]
    pub no_fail_on_first: bool,

    /// Write the trace of the first confirmed bug to this path.
    #[arg(long)]
    pub trace_out: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct ReplayArgs {
    /// Name of the built-in scenario the trace was recorded against.
    pub scenario: String,

    /// Path to a trace file written by `vigil test --trace-out`.
    pub trace_file: PathBuf,
}
