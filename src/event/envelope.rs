//! The `(event, sender, group)` triple a mailbox actually queues.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
use super::traits::AnyEvent;
use crate::util::{ActorId, EventGroupId};

/// One queued item: a type-erased event plus the routing metadata the
/// mailbox and dispatch loop need.
///
/// # Example
/// ```rust
/// use vigil_rt::event::{Envelope, Event};
///
/// #[derive(Debug, Clone)]
/// struct Ping;
/// impl Event for Ping {
///     const EVENT_TYPE: &'static str = "Ping";
/// }
///
/// let envelope = Envelope::new(Ping);
/// assert_eq!(envelope.event_type(), "Ping");
/// assert!(envelope.sender.is_none());
/// ```
#[derive(Debug)]
pub struct Envelope {
    /// The type-erased event payload.
    pub event: AnyEvent,

    /// The actor that sent this event, if any (synthetic sends from the
    /// test engine or timer service have no sender).
    pub sender: Option<ActorId>,

    /// The event group this send inherited or started, if any.
    pub group: Option<EventGroupId>,

    /// Wall-clock creation time, recorded for diagnostics only — never
    /// consulted by the scheduler or dispatch loop.
    pub timestamp: DateTime<Utc>,
}

impl Envelope {
    /// Wraps a concrete event with no sender or group.
    pub fn new<E: super::traits::Event>(event: E) -> Self {
        Self {
            event: Box::new(event),
            sender: None,
            group: None,
            timestamp: Utc::now(),
        }
    }

    /// Wraps an already type-erased event.
    pub fn from_boxed(event: AnyEvent) -> Self {
        Self {
            event,
            sender: None,
            group: None,
            timestamp: Utc::now(),
        }
    }

    /// Attaches the sending actor.
    #[must_use]
    pub fn with_sender(mut self, sender: ActorId) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Attaches an event group.
    #[must_use]
    pub fn with_group(mut self, group: EventGroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// The tag of the event this envelope carries.
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Ping;
    impl super::super::traits::Event for Ping {
        const EVENT_TYPE: &'static str = "Ping";
    }

    #[test]
    fn builder_attaches_metadata() {
        let sender = ActorId::new("Client");
        let group = EventGroupId::new();
        let envelope = Envelope::new(Ping)
            .with_sender(sender.clone())
            .with_group(group);

        assert_eq!(envelope.event_type(), "Ping");
        assert_eq!(envelope.sender, Some(sender));
        assert_eq!(envelope.group, Some(group));
    }
}
