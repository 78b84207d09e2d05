//! Core `Event` trait and the type-erased `EventObject` it is built on.
//!
//! Events are dispatched by dynamic type, including matches against a
//! declared supertype — the source runtime this was ported from expressed
//! that with a covariant event-class hierarchy and reflection-based
//! `is`-checks. The neutral strategy used here (see DESIGN.md) is a
//! tagged-variant scheme: every event carries a static `EVENT_TYPE` tag and
//! an optional list of supertags it also answers to, and a handler
//! registered on a tag matches an event whose own tag *or* any declared
//! supertag equals it. No runtime reflection is involved.

// Layer 1: Standard library imports
use std::any::Any;
use std::fmt::Debug;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::util::TimerId;

/// Compile-time typed event marker.
///
/// # Example
/// ```rust
/// use vigil_rt::event::Event;
///
/// #[derive(Debug, Clone)]
/// struct Ping { from: u64 }
///
/// impl Event for Ping {
///     const EVENT_TYPE: &'static str = "Ping";
/// }
/// ```
pub trait Event: EventObject + Clone + 'static {
    /// Unique event type identifier, resolved at compile time.
    const EVENT_TYPE: &'static str;

    /// Event type tags this event also answers to, for wildcard and
    /// supertype bindings. Most events declare none.
    const SUPER_EVENT_TYPES: &'static [&'static str] = &[];
}

/// Object-safe counterpart of [`Event`], used wherever a mailbox or
/// dispatch table must hold heterogeneous event types. Implemented via a
/// blanket impl for every `Event`; user code never implements this trait
/// directly.
pub trait EventObject: Any + Send + Sync + Debug {
    /// The event's own type tag.
    fn event_type(&self) -> &'static str;

    /// Supertags this event also matches against, most-specific excluded.
    fn super_event_types(&self) -> &'static [&'static str];

    /// Returns true if a handler registered for `tag` should fire for this
    /// event — either an exact match or a declared supertag match.
    fn matches_tag(&self, tag: &str) -> bool {
        self.event_type() == tag || self.super_event_types().contains(&tag)
    }

    /// Narrows back to `&dyn Any` for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Clones the event behind a fresh type-erased box.
    fn clone_boxed(&self) -> Box<dyn EventObject>;
}

impl<T: Event> EventObject for T {
    fn event_type(&self) -> &'static str {
        T::EVENT_TYPE
    }

    fn super_event_types(&self) -> &'static [&'static str] {
        T::SUPER_EVENT_TYPES
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn EventObject> {
        Box::new(self.clone())
    }
}

/// A heterogeneous, type-erased event as stored in a mailbox.
pub type AnyEvent = Box<dyn EventObject>;

/// Attempts to downcast a type-erased event back to its concrete type.
pub fn downcast_event<T: Event>(event: &dyn EventObject) -> Option<&T> {
    event.as_any().downcast_ref::<T>()
}

/// Reserved event that terminates the receiving actor. Delivering further
/// events after `Halt` has been processed is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Halt;

impl Event for Halt {
    const EVENT_TYPE: &'static str = "__halt__";
}

/// Reserved event produced by the timer service when a logical timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerElapsed {
    /// The timer that fired.
    pub timer_id: TimerId,
}

impl Event for TimerElapsed {
    const EVENT_TYPE: &'static str = "__timer_elapsed__";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Ping;
    impl Event for Ping {
        const EVENT_TYPE: &'static str = "Ping";
    }

    #[derive(Debug, Clone)]
    struct SpecificError;
    impl Event for SpecificError {
        const EVENT_TYPE: &'static str = "SpecificError";
        const SUPER_EVENT_TYPES: &'static [&'static str] = &["Error"];
    }

    #[test]
    fn matches_own_tag() {
        let boxed: AnyEvent = Box::new(Ping);
        assert!(boxed.matches_tag("Ping"));
        assert!(!boxed.matches_tag("Pong"));
    }

    #[test]
    fn matches_declared_supertag() {
        let boxed: AnyEvent = Box::new(SpecificError);
        assert!(boxed.matches_tag("SpecificError"));
        assert!(boxed.matches_tag("Error"));
        assert!(!boxed.matches_tag("Other"));
    }

    #[test]
    fn downcast_roundtrips() {
        let boxed: AnyEvent = Box::new(Ping);
        assert!(downcast_event::<Ping>(boxed.as_ref()).is_some());
        assert!(downcast_event::<SpecificError>(boxed.as_ref()).is_none());
    }

    #[test]
    fn halt_and_timer_elapsed_are_reserved() {
        assert_eq!(Halt::EVENT_TYPE, "__halt__");
        assert_eq!(TimerElapsed::EVENT_TYPE, "__timer_elapsed__");
    }

    #[test]
    fn clone_boxed_preserves_type() {
        let boxed: AnyEvent = Box::new(SpecificError);
        let cloned = boxed.clone_boxed();
        assert_eq!(cloned.event_type(), "SpecificError");
    }
}
