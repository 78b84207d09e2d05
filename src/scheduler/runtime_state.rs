//! `RuntimeState`: the process-wide singleton that lives for exactly one
//! test iteration.
//!
//! Grounded on `airssys-rt`'s `system::actor_system::ActorSystem`, which
//! owns the actor table and mailbox senders for the life of a process —
//! generalized here to also own the operation table, monitor table, and
//! step counters, and scoped to a single iteration instead of a long-lived
//! process, since the controlled scheduler tears everything down and
//! rebuilds it fresh between schedules.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::mailbox::ControlledMailbox;
use crate::monitor::MonitorEngine;
use crate::operation::Operation;
use crate::report::{Trace, TraceHeader};
use crate::scheduler::error::SchedulerError;
use crate::util::{reset_id_counter, ActorId, OperationId, TimerId};

/// Everything the scheduler needs to run one iteration, torn down and
/// rebuilt fresh by [`crate::test_engine::TestEngine`] between iterations
/// so there is no cross-iteration leakage.
pub struct RuntimeState {
    pub(crate) operations: DashMap<OperationId, Operation>,
    pub(crate) mailboxes: DashMap<u64, Arc<ControlledMailbox>>,
    pub(crate) monitors: MonitorEngine,
    pub(crate) step: AtomicU64,
    pub(crate) fair_steps: AtomicU64,
    pub(crate) cancelled: AtomicBool,
    pub(crate) trace: Mutex<Trace>,
    pub(crate) fired_timers: DashSet<TimerId>,
    first_error: Mutex<Option<SchedulerError>>,
}

impl RuntimeState {
    /// Creates a fresh, empty runtime state for a new iteration and resets
    /// the global id counter so ids — and therefore the recorded trace —
    /// are reproducible for a given seed.
    pub fn new(header: TraceHeader) -> Arc<Self> {
        reset_id_counter();
        Arc::new(Self {
            operations: DashMap::new(),
            mailboxes: DashMap::new(),
            monitors: MonitorEngine::new(),
            step: AtomicU64::new(0),
            fair_steps: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
            trace: Mutex::new(Trace::new(header)),
            fired_timers: DashSet::new(),
            first_error: Mutex::new(None),
        })
    }

    /// The mailbox for `actor`, creating it if this is the first time the
    /// actor has been referenced.
    pub fn mailbox_for(&self, actor: &ActorId) -> Arc<ControlledMailbox> {
        self.mailboxes
            .entry(actor.as_u64())
            .or_insert_with(|| Arc::new(ControlledMailbox::new()))
            .clone()
    }

    /// Current scheduling step count (every call to `schedule_next` /
    /// `wait_for` advances this by one).
    pub fn step_count(&self) -> u64 {
        self.step.load(Ordering::SeqCst)
    }

    /// Count of steps that were attributed to a fair schedule.
    pub fn fair_step_count(&self) -> u64 {
        self.fair_steps.load(Ordering::SeqCst)
    }

    /// True once the iteration has been cancelled (bug found, step bound
    /// exceeded, or external stop).
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Requests cancellation of every live operation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Records that `timer` has fired at least once, so the scheduler's
    /// next re-scan finds any operation parked on `WaitOn::TimerFire(timer)`
    /// satisfied.
    pub(crate) fn mark_timer_fired(&self, timer: TimerId) {
        self.fired_timers.insert(timer);
    }

    /// Records the error that first cancelled this iteration, if none has
    /// been recorded yet. Later cancellations (every other operation waking
    /// up to observe `is_cancelled`) never overwrite the original cause.
    pub(crate) fn record_first_error(&self, err: SchedulerError) {
        let mut slot = self.first_error.lock();
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    /// Takes the error that ended the iteration, if any, for the caller to
    /// turn into a [`crate::report::BugReport`].
    pub fn take_first_error(&self) -> Option<SchedulerError> {
        self.first_error.lock().take()
    }
}
