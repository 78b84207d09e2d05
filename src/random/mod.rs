//! Controlled nondeterminism for "random" choices.

pub mod service;

pub use service::RandomnessService;
