//! The `State` and `MachineObserver` traits state-machine actors implement
//!.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::actor::ActorContext;
use crate::event::AnyEvent;
use crate::scheduler::SchedulerError;
use crate::state_machine::transition::Transition;

/// One named state in a (possibly nested) state stack. States form a push
/// stack during execution: `Push` enters a sub-state without discarding the
/// parent, `Pop` returns to it.
#[async_trait]
pub trait State: Send + Sync {
    /// Stable state name, used in traces and bug reports.
    fn name(&self) -> &'static str;

    /// Event types deferred (kept queued, re-admitted on any state change)
    /// rather than dispatched while this state is active.
    fn defer_set(&self) -> &'static [&'static str] {
        &[]
    }

    /// Event types silently dropped while this state is active.
    fn ignore_set(&self) -> &'static [&'static str] {
        &[]
    }

    /// Runs once when this state becomes active (via `Goto` or `Push`).
    async fn on_entry(&mut self, _ctx: &ActorContext) -> Result<(), SchedulerError> {
        Ok(())
    }

    /// Runs once when this state is left (via `Goto` or `Pop`).
    async fn on_exit(&mut self, _ctx: &ActorContext) -> Result<(), SchedulerError> {
        Ok(())
    }

    /// Handles one event. Returns [`Transition::Unhandled`] if this state
    /// has no binding for the event's type, which lets the dispatch loop
    /// fall through to the machine's unhandled-event policy.
    async fn on_event(
        &mut self,
        ctx: &ActorContext,
        event: AnyEvent,
    ) -> Result<Transition, SchedulerError>;
}

/// Machine-wide lifecycle observation, independent of which state is
/// active — mirrors [`crate::actor::Actor`]'s lifecycle hooks for the
/// non-state-machine case.
#[async_trait]
pub trait MachineObserver: Send + Sync {
    async fn on_event_deferred(&mut self, _ctx: &ActorContext, _event_type: &'static str) {}

    async fn on_event_ignored(&mut self, _ctx: &ActorContext, _event_type: &'static str) {}

    async fn on_unhandled_event(
        &mut self,
        ctx: &ActorContext,
        event_type: &'static str,
    ) -> Result<(), SchedulerError> {
        Err(ctx.assertion_failure(format!("unhandled event type: {event_type}")))
    }

    async fn on_exception(&mut self, _ctx: &ActorContext, _error: &SchedulerError) {}

    async fn on_halt(&mut self, _ctx: &ActorContext) {}
}

/// A [`MachineObserver`] that applies none of the optional hooks.
pub struct NoopObserver;

#[async_trait]
impl MachineObserver for NoopObserver {}
