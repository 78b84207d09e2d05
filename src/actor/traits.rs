//! The `Actor` trait: plain (non-state-machine) event handlers dispatched
//! one at a time from a private mailbox.
//!
//! Grounded on the old `Actor` trait's lifecycle-callback shape — kept
//! `on_start`/`on_event`/`on_stop` with default no-ops, generalized the
//! single associated message type into the type-erased `AnyEvent` the rest
//! of this runtime dispatches, and added the deferred/ignored/unhandled
//! lifecycle hooks the state-machine side also exposes.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::actor::context::ActorContext;
use crate::event::AnyEvent;
use crate::scheduler::SchedulerError;

/// An actor's event-handling behavior. One `on_event` call runs to
/// completion (modulo any `ctx.receive`/`ctx.wait` points) before the next
/// mailbox item is dispatched.
#[async_trait]
pub trait Actor: Send + Sync {
    /// Display name used in traces and bug reports. Defaults to the Rust
    /// type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Runs once before the first event is dispatched.
    async fn on_start(&mut self, _ctx: &ActorContext) -> Result<(), SchedulerError> {
        Ok(())
    }

    /// Handles one event taken off the mailbox.
    async fn on_event(
        &mut self,
        ctx: &ActorContext,
        event: AnyEvent,
    ) -> Result<(), SchedulerError>;

    /// Runs once after the actor halts, before its operation completes.
    async fn on_stop(&mut self, _ctx: &ActorContext) -> Result<(), SchedulerError> {
        Ok(())
    }

    /// Called when an installed `receive` predicate rejected an event that
    /// otherwise matched its type filter; the event is deferred back onto
    /// the mailbox. Default is a no-op.
    async fn on_event_deferred(&mut self, _ctx: &ActorContext, _event_type: &'static str) {}

    /// Called when an event type appears in the actor's declared ignore
    /// set. Default is a no-op; the event is dropped either way.
    async fn on_event_ignored(&mut self, _ctx: &ActorContext, _event_type: &'static str) {}

    /// Called when no handler claims an event type at all. Returning `Err`
    /// ends the iteration as a user assertion failure; the default does
    /// exactly that, since a silently-dropped unhandled event usually means
    /// a missing case.
    async fn on_unhandled_event(
        &mut self,
        ctx: &ActorContext,
        event_type: &'static str,
    ) -> Result<(), SchedulerError> {
        Err(ctx.assertion_failure(format!("unhandled event type: {event_type}")))
    }

    /// Called when `on_event` itself returns `Err`, before that error
    /// propagates and ends the iteration. Default is a no-op; override to
    /// log or clean up.
    async fn on_exception(&mut self, _ctx: &ActorContext, _error: &SchedulerError) {}
}
