//! What a [`crate::state_machine::State::on_event`] handler may request —
//! exactly one of these per call, which is how "exactly-one transition" is
//! enforced: the return type structurally rules out raising more than one
//!.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::event::AnyEvent;
use crate::state_machine::traits::State;

/// The outcome of handling one event.
pub enum Transition {
    /// Handled; no state change.
    None,
    /// Run the current state's exit action, pop to the owning level, push
    /// `state`, run its entry action.
    Goto(Box<dyn State>),
    /// Run `state`'s entry action without popping the current state.
    Push(Box<dyn State>),
    /// Run the current state's exit action and pop one level.
    Pop,
    /// Re-enter dispatch with `event` at the front, without touching the
    /// mailbox.
    Raise(AnyEvent),
    /// Run the halt hook and stop the machine; remaining mailbox contents
    /// are dropped.
    Halt,
    /// No handler bound to this event type in the current state.
    Unhandled,
}
