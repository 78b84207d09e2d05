//! Operations: the scheduled units the [`crate::scheduler`] hands control
//! back and forth between.
//!
//! Grounded on `airssys-rt`'s `actor::lifecycle::ActorState` (a small status
//! enum driving a single entity's lifecycle) generalized to cover every
//! kind of schedulable work this runtime hands off: an actor's dispatch
//! loop, a user test task, and the synthetic operation a logical timer
//! occupies while armed.

pub mod types;

pub use types::{Operation, OperationKind, OperationStatus, WaitOn};
