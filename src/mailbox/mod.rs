//! Per-actor mailbox: FIFO queue, deferred set, and receive-await slot.
//!
//! Generalizes `airssys-rt`'s bounded/unbounded mailbox split into a single
//! [`ControlledMailbox`] type, since under the controlled scheduler there is
//! never more than one live operation to apply backpressure against.

pub mod controlled;
pub mod traits;

pub use controlled::ControlledMailbox;
pub use traits::{EnqueueStatus, MailboxError, RejectReason};
