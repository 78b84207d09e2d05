//! Event system: the immutable, dynamically-typed messages carried by
//! mailboxes.
//!
//! This module generalizes `airssys-rt`'s `message` module (a
//! `Message`/`MessageEnvelope` pair generic over one message type per
//! actor) to heterogeneous dispatch: one actor's mailbox can receive many
//! distinct `Event` types, matched by tag at dispatch time rather than by
//! the Rust type system. See [`traits::Event`] for the full rationale.

pub mod envelope;
pub mod traits;

pub use envelope::Envelope;
pub use traits::{downcast_event, AnyEvent, Event, EventObject, Halt, TimerElapsed};
