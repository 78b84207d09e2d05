//! The iteration driver: builds a fresh runtime per iteration, runs a
//! program's setup closure against it, and turns the recorded trace and
//! first error into a coverage/bug report pair.

pub mod config;
pub mod engine;

pub use config::TestConfig;
pub use engine::{TestEngine, TestRunReport};
