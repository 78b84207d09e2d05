//! Stable numeric identifiers for the entities the scheduler tracks.
//!
//! Every id in this module is a thin wrapper around a process-local `u64`
//! counter. Unlike a `Uuid`-keyed id, identity here must be numeric and
//! comparison must be by that number alone — the data model requires "two
//! ActorIds are equal iff their numeric ids are equal", and a recorded
//! trace is a sequence of these numbers, so random 128-bit ids would make
//! trace files unreadable and replay comparisons meaningless.

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// Monotonically increasing counter shared by all id kinds in one process.
///
/// A single counter means ids are globally ordered by creation time across
/// kinds, which keeps interleaved actor/operation/timer ids readable in a
/// trace record.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_raw_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Resets the global id counter. The test engine calls this at the start of
/// each iteration so that ids — and therefore recorded traces — are
/// reproducible across repeated runs of the same seed.
pub fn reset_id_counter() {
    NEXT_ID.store(1, Ordering::Relaxed);
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Allocates a fresh id from the global counter.
            pub fn new() -> Self {
                Self(next_raw_id())
            }

            /// Returns the raw numeric value, e.g. for embedding in a trace record.
            pub fn as_u64(&self) -> u64 {
                self.0
            }

            /// Reconstructs an id from a raw value, used by the replay strategy
            /// when reading recorded trace records back from disk.
            pub fn from_u64(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifies an operation tracked by the scheduler (an actor dispatch
    /// loop, a user task, or a monitor call wrapper).
    OperationId
);

numeric_id!(
    /// Identifies a monitor instance registered with the monitor engine.
    MonitorId
);

numeric_id!(
    /// Identifies a logical timer created by `start_timer` / `start_periodic_timer`.
    TimerId
);

numeric_id!(
    /// Correlation token propagated from a send to the actors and events it
    /// causally produces, used to join "all effects of request R".
    EventGroupId
);

/// Opaque handle to an actor. Creating an `ActorId` does not create the
/// actor — binding happens the first time the scheduler runs the actor's
/// dispatch loop for that id.
///
/// Two `ActorId`s are equal iff their numeric ids are equal; the type tag
/// and name are carried for diagnostics only and never participate in
/// equality or hashing.
///
/// # Example
/// ```rust
/// use vigil_rt::util::ActorId;
///
/// let a = ActorId::new("Client").with_name("client-1");
/// let b = a.clone();
/// assert_eq!(a, b);
/// assert_ne!(a, ActorId::new("Client"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorId {
    id: u64,
    type_tag: &'static str,
    name: Option<String>,
    group: Option<EventGroupId>,
}

impl ActorId {
    /// Allocates a fresh `ActorId` for an actor of the given type tag.
    pub fn new(type_tag: &'static str) -> Self {
        Self {
            id: next_raw_id(),
            type_tag,
            name: None,
            group: None,
        }
    }

    /// Attaches a human-readable name, shown in diagnostics and traces.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches the event group this actor was created under, so actors it
    /// creates or events it sends while handling a grouped event inherit
    /// the same group.
    #[must_use]
    pub fn with_group(mut self, group: EventGroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// The raw numeric id, used as the key into the scheduler's operation
    /// and actor tables.
    pub fn as_u64(&self) -> u64 {
        self.id
    }

    /// The actor's static type tag (its Rust type name, by convention).
    pub fn type_tag(&self) -> &'static str {
        self.type_tag
    }

    /// The actor's human name, if one was given at creation.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The event group this actor was created under, if any.
    pub fn group(&self) -> Option<EventGroupId> {
        self.group
    }
}

impl PartialEq for ActorId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ActorId {}

impl std::hash::Hash for ActorId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}({}#{})", self.type_tag, self.id),
            None => write!(f, "{}#{}", self.type_tag, self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_ids_compare_by_number_only() {
        let a = ActorId::new("Client").with_name("c1");
        let b = ActorId::new("Client").with_name("c1");
        assert_ne!(a, b, "distinct allocations must not be equal");
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn operation_ids_are_monotonic() {
        reset_id_counter();
        let a = OperationId::new();
        let b = OperationId::new();
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn reset_restores_determinism() {
        reset_id_counter();
        let a = OperationId::new();
        reset_id_counter();
        let b = OperationId::new();
        assert_eq!(a, b);
    }

    #[test]
    fn actor_id_display_includes_name_when_present() {
        let named = ActorId::new("Server").with_name("srv");
        assert!(format!("{named}").starts_with("srv("));

        let anon = ActorId::new("Server");
        assert!(format!("{anon}").starts_with("Server#"));
    }
}
