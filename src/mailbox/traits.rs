//! Mailbox error types and the outcome of an enqueue.
//!
//! Generalizes `airssys-rt`'s `mailbox::traits::{MailboxError, TryRecvError}`
//! from a bounded/unbounded backpressure model to the three-way outcome a
//! dispatch loop needs to distinguish: a plain enqueue, an enqueue that
//! synchronously satisfies a pending `receive`, and a rejected send to a
//! halted actor.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
// (none)

/// Result of `ControlledMailbox::enqueue`.
///
/// # Example
/// ```rust
/// use vigil_rt::mailbox::EnqueueStatus;
///
/// let status = EnqueueStatus::Accepted;
/// assert!(status.is_accepted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueStatus {
    /// The event was appended to the mailbox's queue.
    Accepted,
    /// The event was consumed synchronously by a pending `receive`, which
    /// the scheduler must now mark enabled.
    AcceptedWakesReceive,
    /// The actor has halted; the send was dropped.
    Rejected(RejectReason),
}

impl EnqueueStatus {
    /// True for either accepted variant.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted | Self::AcceptedWakesReceive)
    }
}

/// Why an enqueue was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The receiving actor has already halted.
    Halted,
}

/// Errors surfaced by mailbox operations other than enqueue/dequeue status.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MailboxError {
    /// A `receive` predicate panicked or returned an error; treated as a
    /// user assertion failure rather than silently dropping the event.
    #[error("receive predicate failed for event {event_type}: {reason}")]
    PredicateFailed {
        event_type: &'static str,
        reason: String,
    },

    /// More than one pending `receive` was installed on the same mailbox;
    /// the data model allows at most one outstanding descriptor.
    #[error("a receive-await is already installed on this mailbox")]
    ReceiveAlreadyInstalled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_variants_report_true() {
        assert!(EnqueueStatus::Accepted.is_accepted());
        assert!(EnqueueStatus::AcceptedWakesReceive.is_accepted());
        assert!(!EnqueueStatus::Rejected(RejectReason::Halted).is_accepted());
    }
}
