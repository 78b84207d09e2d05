//! `clap`-derived argument parsing and dispatch for the `vigil` binary.
//! Kept in the library so the binary target stays a thin `main`.

pub mod args;
pub mod run;
pub mod scenarios;

pub use args::Cli;
pub use run::dispatch;
