//! `ControlledMailbox`: the per-actor FIFO queue, deferred set, and
//! receive-await descriptor the scheduler dispatches through.
//!
//! Generalizes `airssys-rt`'s `BoundedMailbox`/`UnboundedMailbox` split
//! (capacity and backpressure strategy per mailbox) down to a single,
//! unbounded, logically-locked queue: under the controlled scheduler only
//! one operation is ever live at a time, so there is nothing
//! for a backpressure strategy to arbitrate between, and the uncontrolled
//! (production) scheduler is out of this crate's core scope.

// Layer 1: Standard library imports
use std::collections::VecDeque;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;

// Layer 3: Internal module imports
use super::traits::{EnqueueStatus, MailboxError, RejectReason};
use crate::event::{AnyEvent, Envelope};
use crate::util::{ActorId, EventGroupId};

/// A pending `receive(types, predicate?)` installed by the owning actor.
struct ReceiveDescriptor {
    types: Vec<&'static str>,
    predicate: Option<Box<dyn Fn(&dyn crate::event::EventObject) -> bool + Send>>,
}

impl ReceiveDescriptor {
    fn matches(&self, envelope: &Envelope) -> Result<bool, MailboxError> {
        let type_matches = self
            .types
            .iter()
            .any(|wanted| envelope.event.matches_tag(wanted));
        if !type_matches {
            return Ok(false);
        }
        match &self.predicate {
            None => Ok(true),
            Some(pred) => Ok(pred(envelope.event.as_ref())),
        }
    }
}

struct Inner {
    queue: VecDeque<Envelope>,
    deferred: VecDeque<Envelope>,
    receive: Option<ReceiveDescriptor>,
    delivered: Option<Envelope>,
    halted: bool,
    dead_letters: u64,
}

/// The FIFO mailbox owned by one actor.
///
/// # Invariants
/// - A receive-await and a non-empty *matching* head cannot both exist: the
///   head is consumed synchronously into the await at install time.
/// - Deferred events are restored to the front of the queue, in FIFO order,
///   the first time the actor enters a state whose defer/ignore sets no
///   longer both exclude them.
/// - Once halted, further sends are accepted as inert no-ops, counted as
///   dead letters.
pub struct ControlledMailbox {
    inner: Mutex<Inner>,
}

impl ControlledMailbox {
    /// Creates an empty mailbox.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                deferred: VecDeque::new(),
                receive: None,
                delivered: None,
                halted: false,
                dead_letters: 0,
            }),
        }
    }

    /// Enqueues an event sent by `sender`, optionally tagged with an event
    /// group. Returns the status the scheduler uses to decide whether the
    /// receiving operation just became enabled.
    pub fn enqueue(
        &self,
        event: AnyEvent,
        sender: Option<ActorId>,
        group: Option<EventGroupId>,
    ) -> Result<EnqueueStatus, MailboxError> {
        let mut inner = self.inner.lock();
        if inner.halted {
            inner.dead_letters += 1;
            return Ok(EnqueueStatus::Rejected(RejectReason::Halted));
        }

        let mut envelope = Envelope::from_boxed(event);
        envelope.sender = sender;
        envelope.group = group;

        if let Some(descriptor) = inner.receive.take() {
            if descriptor.matches(&envelope)? {
                inner.delivered = Some(envelope);
                return Ok(EnqueueStatus::AcceptedWakesReceive);
            }
            // Not a match: queue normally and keep the descriptor installed.
            inner.receive = Some(descriptor);
        }

        inner.queue.push_back(envelope);
        Ok(EnqueueStatus::Accepted)
    }

    /// Dequeues the next event at the head of the queue, if any. Does not
    /// apply defer/ignore logic — that is the dispatch loop's job once it
    /// has looked up the current state.
    pub fn dequeue(&self) -> Option<Envelope> {
        self.inner.lock().queue.pop_front()
    }

    /// Peeks the event type at the head without removing it.
    pub fn peek_type(&self) -> Option<&'static str> {
        self.inner.lock().queue.front().map(Envelope::event_type)
    }

    /// Installs a receive-await for the given event type tags and optional
    /// predicate. If the head of the queue already matches, it is consumed
    /// immediately and returned; otherwise `None` is returned and the
    /// caller must suspend until `take_delivered` yields a value.
    pub fn install_receive(
        &self,
        types: Vec<&'static str>,
        predicate: Option<Box<dyn Fn(&dyn crate::event::EventObject) -> bool + Send>>,
    ) -> Result<Option<Envelope>, MailboxError> {
        let mut inner = self.inner.lock();
        if inner.receive.is_some() {
            return Err(MailboxError::ReceiveAlreadyInstalled);
        }

        let head_accepted = match inner.queue.front() {
            Some(head) => {
                let type_matches = types.iter().any(|wanted| head.event.matches_tag(wanted));
                type_matches
                    && match &predicate {
                        None => true,
                        Some(pred) => pred(head.event.as_ref()),
                    }
            }
            None => false,
        };
        if head_accepted {
            if let Some(envelope) = inner.queue.pop_front() {
                return Ok(Some(envelope));
            }
        }

        inner.receive = Some(ReceiveDescriptor { types, predicate });
        Ok(None)
    }

    /// Takes the event delivered to a previously-installed receive-await,
    /// once the scheduler has resumed the waiting operation.
    pub fn take_delivered(&self) -> Option<Envelope> {
        self.inner.lock().delivered.take()
    }

    /// Moves an event into the deferred set, to be re-admitted later by
    /// `reclaim_deferred`.
    pub fn defer(&self, envelope: Envelope) {
        self.inner.lock().deferred.push_back(envelope);
    }

    /// Re-admits deferred events whose predicate (generally "no longer in
    /// this state's defer/ignore sets") now returns true, restoring them to
    /// the front of the queue in their original relative (FIFO) order.
    pub fn reclaim_deferred(&self, mut no_longer_deferred: impl FnMut(&Envelope) -> bool) {
        let mut inner = self.inner.lock();
        let mut remaining = VecDeque::with_capacity(inner.deferred.len());
        let mut reclaimed = VecDeque::new();
        while let Some(envelope) = inner.deferred.pop_front() {
            if no_longer_deferred(&envelope) {
                reclaimed.push_back(envelope);
            } else {
                remaining.push_back(envelope);
            }
        }
        inner.deferred = remaining;
        // Restore in FIFO order at the front: oldest reclaimed event goes
        // first, so push from the back of `reclaimed`.
        while let Some(envelope) = reclaimed.pop_back() {
            inner.queue.push_front(envelope);
        }
    }

    /// Marks the mailbox halted: further sends are rejected as dead
    /// letters, and any queued events are dropped.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.halted = true;
        inner.queue.clear();
        inner.deferred.clear();
        inner.receive = None;
    }

    /// True once `close` has been called.
    pub fn is_halted(&self) -> bool {
        self.inner.lock().halted
    }

    /// Number of sends rejected because the actor had already halted.
    pub fn dead_letter_count(&self) -> u64 {
        self.inner.lock().dead_letters
    }

    /// Number of events currently queued (excludes deferred events).
    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// True if no events are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if a parked `WaitOn::EventArrival` operation on this mailbox
    /// would now find something to resume with: either a receive-await has
    /// already been synchronously delivered into, or no receive-await is
    /// installed and the queue is non-empty (the plain `receive_any` case,
    /// which just dequeues the head without a descriptor).
    pub fn has_pending_arrival(&self) -> bool {
        let inner = self.inner.lock();
        inner.delivered.is_some() || (inner.receive.is_none() && !inner.queue.is_empty())
    }
}

impl Default for ControlledMailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    #[derive(Debug, Clone)]
    struct Ping;
    impl Event for Ping {
        const EVENT_TYPE: &'static str = "Ping";
    }

    #[derive(Debug, Clone)]
    struct Pong;
    impl Event for Pong {
        const EVENT_TYPE: &'static str = "Pong";
    }

    #[test]
    fn enqueue_then_dequeue_preserves_fifo_order() {
        let mailbox = ControlledMailbox::new();
        mailbox.enqueue(Box::new(Ping), None, None).unwrap();
        mailbox.enqueue(Box::new(Pong), None, None).unwrap();

        assert_eq!(mailbox.dequeue().unwrap().event_type(), "Ping");
        assert_eq!(mailbox.dequeue().unwrap().event_type(), "Pong");
        assert!(mailbox.dequeue().is_none());
    }

    #[test]
    fn receive_consumes_matching_head_synchronously() {
        let mailbox = ControlledMailbox::new();
        mailbox.enqueue(Box::new(Ping), None, None).unwrap();

        let result = mailbox.install_receive(vec!["Ping"], None).unwrap();
        assert!(result.is_some());
        assert!(mailbox.is_empty());
    }

    #[test]
    fn receive_installs_descriptor_when_head_does_not_match() {
        let mailbox = ControlledMailbox::new();
        mailbox.enqueue(Box::new(Pong), None, None).unwrap();

        let result = mailbox.install_receive(vec!["Ping"], None).unwrap();
        assert!(result.is_none(), "Pong must not satisfy a Ping receive");

        // Non-matching head is left untouched, not reordered.
        assert_eq!(mailbox.peek_type(), Some("Pong"));

        let status = mailbox.enqueue(Box::new(Ping), None, None).unwrap();
        assert_eq!(status, EnqueueStatus::AcceptedWakesReceive);
        assert_eq!(mailbox.take_delivered().unwrap().event_type(), "Ping");
    }

    #[test]
    fn halted_mailbox_drops_sends_as_dead_letters() {
        let mailbox = ControlledMailbox::new();
        mailbox.close();

        let status = mailbox.enqueue(Box::new(Ping), None, None).unwrap();
        assert_eq!(status, EnqueueStatus::Rejected(RejectReason::Halted));
        assert_eq!(mailbox.dead_letter_count(), 1);
    }

    #[test]
    fn deferred_events_are_reclaimed_in_fifo_order() {
        let mailbox = ControlledMailbox::new();
        mailbox.defer(Envelope::new(Ping));
        mailbox.defer(Envelope::new(Pong));
        mailbox.enqueue(Box::new(Ping), None, None).unwrap();

        mailbox.reclaim_deferred(|_| true);

        assert_eq!(mailbox.dequeue().unwrap().event_type(), "Ping");
        assert_eq!(mailbox.dequeue().unwrap().event_type(), "Pong");
        assert_eq!(mailbox.dequeue().unwrap().event_type(), "Ping");
    }

    #[test]
    fn receive_predicate_rejecting_everything_leaves_mailbox_unchanged() {
        let mailbox = ControlledMailbox::new();
        mailbox.enqueue(Box::new(Ping), None, None).unwrap();

        let result = mailbox
            .install_receive(vec!["Ping"], Some(Box::new(|_| false)))
            .unwrap();
        assert!(result.is_none());
        assert_eq!(mailbox.peek_type(), Some("Ping"));
    }
}
