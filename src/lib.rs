//! # vigil-rt — a systematic concurrency-testing runtime
//!
//! `vigil-rt` runs actor and state-machine programs under a *controlled*
//! scheduler: every interleaving decision, every "random" choice, and every
//! timer firing is resolved by a pluggable [`strategy::Strategy`] instead of
//! the OS or a PRNG. Running the same program many times under different
//! strategies turns flaky concurrency bugs into ones you can reproduce on
//! demand, by replaying the exact trace that found them.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vigil_rt::prelude::*;
//!
//! #[derive(Debug, Clone)]
//! struct Ping;
//! impl Event for Ping {
//!     const EVENT_TYPE: &'static str = "Ping";
//! }
//!
//! struct PingActor;
//!
//! #[async_trait::async_trait]
//! impl Actor for PingActor {
//!     async fn on_event(&mut self, _ctx: &ActorContext, _event: AnyEvent) -> Result<(), SchedulerError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TestConfig::new(StrategyKind::Random).with_iterations(100);
//!     let engine = TestEngine::new(config);
//!     let report = engine
//!         .run(|scheduler, timers| async move {
//!             let actor_id = ActorId::new("Ping");
//!             vec![spawn_actor(scheduler, timers, actor_id, Box::new(PingActor))]
//!         })
//!         .await;
//!     println!("{:?}", report.coverage);
//! }
//! ```
//!
//! # Module Organization
//!
//! ## Execution model
//! - [`actor`] — plain event-handler actors dispatched from a private mailbox
//! - [`state_machine`] — hierarchical state machines: entry/exit actions,
//!   goto/push/pop transitions, per-state defer/ignore sets
//! - [`event`] — the type-erased event objects mailboxes carry
//! - [`mailbox`] — per-actor FIFO queue, deferred set, receive-await slot
//! - [`operation`] — the scheduled units the scheduler hands control between
//!
//! ## Controlled execution
//! - [`scheduler`] — the single authority deciding which operation runs next
//! - [`strategy`] — pluggable exploration strategies (random, probabilistic,
//!   priority, DFS, replay)
//! - [`random`] — controlled/production dual-mode randomness
//! - [`timer`] — logical timers as ordinary scheduled operations
//! - [`monitor`] — safety and liveness monitors
//!
//! ## Running and reporting
//! - [`test_engine`] — the iteration driver: builds a fresh runtime per
//!   iteration and turns the result into a [`report::BugReport`] /
//!   [`report::CoverageReport`]
//! - [`report`] — trace, bug, and coverage artifact types
//! - [`cli`] — `clap`-derived argument parsing for the `vigil` binary
//!
//! ## Infrastructure
//! - [`error`] — the crate-wide [`error::VigilError`]
//! - [`util`] — numeric ids and small serde helpers

pub mod actor;
pub mod cli;
pub mod error;
pub mod event;
pub mod mailbox;
pub mod monitor;
pub mod operation;
pub mod random;
pub mod report;
pub mod scheduler;
pub mod state_machine;
pub mod strategy;
pub mod test_engine;
pub mod timer;
pub mod util;

pub mod prelude;

pub use error::VigilError;
