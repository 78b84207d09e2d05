//! The controlled scheduler: the single authority that decides which
//! operation runs next, replacing every ambient source of nondeterminism
//! with a call into the configured [`Strategy`].
//!
//! Grounded on `system::actor_system::ActorSystem` for the "one owner holds
//! every table, methods take `&self` and use interior mutability" shape,
//! generalized from owning actors to owning the whole cooperative runtime:
//! at any moment exactly one registered [`Operation`] is actually running
//! and every other live operation is parked on its own [`tokio::sync::Notify`],
//! so the set of possible interleavings is entirely determined by the
//! handoff order this scheduler chooses.

// Layer 1: Standard library imports
use std::sync::atomic::Ordering;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tracing::{debug, trace};

// Layer 3: Internal module imports
use crate::event::EventObject;
use crate::operation::{Operation, OperationKind, OperationStatus, WaitOn};
use crate::report::TraceRecord;
use crate::scheduler::error::SchedulerError;
use crate::scheduler::runtime_state::RuntimeState;
use crate::strategy::Strategy;
use crate::util::OperationId;

/// What an operation is doing when it calls into the scheduler to give up
/// control at a scheduling point.
enum ParkState {
    /// Still runnable; this is a voluntary yield (`schedule_next`).
    Runnable,
    /// Blocked on a dependency (`wait_for`).
    Waiting(WaitOn),
}

enum StepOutcome {
    Next(OperationId),
    /// Every operation has completed; nothing left to schedule.
    Finished,
}

/// Owns one iteration's [`RuntimeState`] and the [`Strategy`] deciding every
/// choice within it.
pub struct Scheduler {
    state: Arc<RuntimeState>,
    strategy: Arc<Mutex<Box<dyn Strategy>>>,
    max_steps: u64,
}

impl Scheduler {
    pub fn new(state: Arc<RuntimeState>, strategy: Box<dyn Strategy>, max_steps: u64) -> Arc<Self> {
        Self::with_shared_strategy(state, Arc::new(Mutex::new(strategy)), max_steps)
    }

    /// Builds a scheduler sharing `strategy` with other iterations. Needed
    /// by [`crate::test_engine::TestEngine`]'s run loop: a DFS-style
    /// strategy must persist across iterations to backtrack correctly,
    /// while each iteration otherwise gets a brand new [`RuntimeState`].
    pub fn with_shared_strategy(
        state: Arc<RuntimeState>,
        strategy: Arc<Mutex<Box<dyn Strategy>>>,
        max_steps: u64,
    ) -> Arc<Self> {
        Arc::new(Self {
            state,
            strategy,
            max_steps,
        })
    }

    pub fn state(&self) -> &Arc<RuntimeState> {
        &self.state
    }

    /// Registers a monitor for this iteration. `hot_threshold` is the
    /// number of consecutive fair steps the monitor may stay in a hot
    /// state before the run ends as a liveness violation.
    pub fn register_monitor(
        &self,
        monitor: Box<dyn crate::monitor::Monitor>,
        hot_threshold: u64,
    ) -> crate::util::MonitorId {
        self.state.monitors.register(monitor, hot_threshold)
    }

    /// Registers a new operation in the `Created` state and returns its id.
    /// The caller must still call [`Scheduler::start_operation`] before the
    /// task it represents is allowed to run.
    pub fn register_operation(&self, kind: OperationKind) -> OperationId {
        let op = Operation::new(kind);
        let id = op.id();
        self.state.operations.insert(id, op);
        id
    }

    /// Blocks the calling task until the scheduler first picks it to run.
    /// Every operation must call this exactly once, immediately after
    /// [`Scheduler::register_operation`], before touching any shared state.
    pub async fn start_operation(&self, id: OperationId) -> Result<(), SchedulerError> {
        self.reschedule(id, ParkState::Runnable).await
    }

    /// A voluntary scheduling point: gives the scheduler a chance to switch
    /// to a different enabled operation before the caller continues.
    pub async fn schedule_next(&self, current: OperationId) -> Result<(), SchedulerError> {
        self.reschedule(current, ParkState::Runnable).await
    }

    /// Parks `current` until `on` is satisfied, yielding control to another
    /// enabled operation in the meantime.
    pub async fn wait_for(&self, current: OperationId, on: WaitOn) -> Result<(), SchedulerError> {
        self.reschedule(current, ParkState::Waiting(on)).await
    }

    /// Marks `id` finished and hands control to the next runnable
    /// operation, if any. Does not park the caller: a completed operation's
    /// task is about to exit.
    pub fn complete_operation(&self, id: OperationId) -> Result<(), SchedulerError> {
        if let Some(mut op) = self.state.operations.get_mut(&id) {
            op.mark_completed();
        }
        match self.step_and_pick()? {
            StepOutcome::Finished => {
                let violation = self
                    .state
                    .monitors
                    .check_liveness()
                    .or_else(|| self.state.monitors.check_hot_at_finish());
                if let Some(violation) = violation {
                    let err: SchedulerError = violation.into();
                    self.state.record_first_error(err.clone());
                    self.state.cancel();
                    self.wake_all();
                    return Err(err);
                }
                Ok(())
            }
            StepOutcome::Next(next) if next == id => Ok(()),
            StepOutcome::Next(next) => {
                self.wake(next);
                Ok(())
            }
        }
    }

    /// Resolves a controlled boolean draw for `current`'s random choice.
    pub fn next_boolean(&self, current: OperationId) -> bool {
        let value = self.strategy.lock().next_boolean();
        self.record_random_draw(current, value as u64);
        value
    }

    /// Resolves a controlled integer draw in `0..max` for `current`.
    pub fn next_integer(&self, current: OperationId, max: u64) -> u64 {
        let value = self.strategy.lock().next_integer(max);
        self.record_random_draw(current, value);
        value
    }

    /// Delivers `event` to every registered monitor, converting a raised
    /// safety violation into a scheduler error.
    pub fn notify_monitors(&self, event: &dyn EventObject) -> Result<(), SchedulerError> {
        if let Some(violation) = self.state.monitors.notify_event(event) {
            let err: SchedulerError = violation.into();
            self.state.record_first_error(err.clone());
            self.state.cancel();
            self.wake_all();
            return Err(err);
        }
        Ok(())
    }

    /// Called once per completed actor handler invocation: advances the
    /// fair-step count monitors are checked against (see DESIGN.md's
    /// fairness accounting decision).
    pub fn record_fair_step(&self) -> Result<(), SchedulerError> {
        self.state.fair_steps.fetch_add(1, Ordering::SeqCst);
        self.state.monitors.advance_hot_streaks();
        if let Some(violation) = self.state.monitors.check_liveness() {
            let err: SchedulerError = violation.into();
            self.state.record_first_error(err.clone());
            self.state.cancel();
            self.wake_all();
            return Err(err);
        }
        Ok(())
    }

    /// Raises a user assertion failure, cancelling the iteration.
    pub fn notify_assertion_failure(&self, message: impl Into<String>) -> SchedulerError {
        let err = SchedulerError::UserAssertionFailed {
            message: message.into(),
        };
        self.state.record_first_error(err.clone());
        self.state.cancel();
        self.wake_all();
        err
    }

    /// An operation reached a concurrency primitive the scheduler cannot
    /// see through (e.g. raw `thread::spawn`). Ends the iteration as a
    /// configuration error rather than silently losing control of the
    /// schedule.
    pub fn notify_uncontrolled_invocation(
        &self,
        operation: OperationId,
        method: &'static str,
    ) -> SchedulerError {
        let err = SchedulerError::UncontrolledInvocation { operation, method };
        self.state.record_first_error(err.clone());
        self.state.cancel();
        self.wake_all();
        err
    }

    /// Re-enables `target`'s dispatch operation immediately if it is parked
    /// on `WaitOn::EventArrival`, instead of leaving the transition to the
    /// next time some other operation reaches a scheduling point. Only flips
    /// the status, never wakes the task directly: the caller (the sender)
    /// is still running and handing control off is still the scheduler's
    /// job at its own next `step_and_pick`.
    pub(crate) fn reenable_actor(&self, target: &crate::util::ActorId) {
        let mut hit = None;
        for entry in self.state.operations.iter() {
            if let OperationKind::ActorDispatch(actor_id) = entry.value().kind() {
                if actor_id == target
                    && entry.value().status() == OperationStatus::Paused
                    && matches!(entry.value().waiting_on(), Some(WaitOn::EventArrival))
                {
                    hit = Some(*entry.key());
                    break;
                }
            }
        }
        if let Some(id) = hit {
            if let Some(mut op) = self.state.operations.get_mut(&id) {
                op.mark_enabled();
            }
        }
    }

    fn record_random_draw(&self, current: OperationId, value: u64) {
        let step = self.state.step.load(Ordering::SeqCst);
        self.state.trace.lock().push(TraceRecord {
            step,
            op_id: current,
            random_bits: Some(value),
        });
    }

    fn wake(&self, id: OperationId) {
        if let Some(op) = self.state.operations.get(&id) {
            op.wake();
        }
    }

    /// Wakes every operation currently parked on its own `Notify`. Called
    /// whenever the iteration is cancelled so no parked task is left
    /// waiting forever for a handoff that will never come; each one wakes,
    /// observes `is_cancelled`, and unwinds with `SchedulerError::Cancelled`.
    fn wake_all(&self) {
        for entry in self.state.operations.iter() {
            entry.value().wake();
        }
    }

    async fn reschedule(&self, current: OperationId, park: ParkState) -> Result<(), SchedulerError> {
        if self.state.is_cancelled() {
            return Err(SchedulerError::Cancelled);
        }

        match park {
            ParkState::Runnable => {
                if let Some(mut op) = self.state.operations.get_mut(&current) {
                    op.mark_enabled();
                }
            }
            ParkState::Waiting(on) => {
                if let Some(mut op) = self.state.operations.get_mut(&current) {
                    op.mark_paused(on);
                }
            }
        }

        let next = match self.step_and_pick()? {
            StepOutcome::Next(next) => next,
            StepOutcome::Finished => return Ok(()),
        };

        if next == current {
            return Ok(());
        }

        let wake_handle = self.state.operations.get(&current).map(|op| op.wake_handle());
        self.wake(next);

        if let Some(handle) = wake_handle {
            handle.notified().await;
        }

        if self.state.is_cancelled() {
            return Err(SchedulerError::Cancelled);
        }
        Ok(())
    }

    fn step_and_pick(&self) -> Result<StepOutcome, SchedulerError> {
        let step = self.state.step.fetch_add(1, Ordering::SeqCst);
        if step >= self.max_steps {
            let err = SchedulerError::StepBoundExceeded {
                max_steps: self.max_steps,
            };
            self.state.record_first_error(err.clone());
            self.state.cancel();
            self.wake_all();
            return Err(err);
        }

        self.reenable_satisfied_waiters();

        let mut enabled = Vec::new();
        let mut paused_operations = Vec::new();
        for entry in self.state.operations.iter() {
            match entry.value().status() {
                OperationStatus::Enabled => enabled.push(*entry.key()),
                OperationStatus::Paused => paused_operations.push(*entry.key()),
                OperationStatus::Created | OperationStatus::Completed => {}
            }
        }

        if enabled.is_empty() {
            return if !paused_operations.is_empty() {
                let paused_count = paused_operations.len();
                let err = SchedulerError::Deadlock { paused_operations };
                self.state.record_first_error(err.clone());
                self.state.cancel();
                self.wake_all();
                debug!(paused_count, "deadlock: no enabled operation remains");
                Err(err)
            } else {
                Ok(StepOutcome::Finished)
            };
        }

        let chosen = self.strategy.lock().next_operation(&enabled, step);
        trace!(step, op_id = ?chosen, enabled_count = enabled.len(), "scheduling step");
        self.state.trace.lock().push(TraceRecord {
            step,
            op_id: chosen,
            random_bits: None,
        });
        Ok(StepOutcome::Next(chosen))
    }

    /// Moves every `Paused` operation whose `waiting_on` dependency has
    /// become satisfied back to `Enabled`, so the Strategy sees it as a
    /// candidate this step. Without this, an operation parked on a mailbox,
    /// a timer, or another operation's completion would stay `Paused`
    /// forever even after the thing it was waiting for actually happened.
    fn reenable_satisfied_waiters(&self) {
        let mut satisfied = Vec::new();
        for entry in self.state.operations.iter() {
            let op = entry.value();
            if op.status() == OperationStatus::Paused && self.wait_satisfied(op) {
                satisfied.push(*entry.key());
            }
        }
        for id in satisfied {
            if let Some(mut op) = self.state.operations.get_mut(&id) {
                op.mark_enabled();
            }
        }
    }

    fn wait_satisfied(&self, op: &Operation) -> bool {
        match op.waiting_on() {
            Some(wait) => self.check_wait(wait, op.kind()),
            None => false,
        }
    }

    fn check_wait(&self, wait: &WaitOn, kind: &OperationKind) -> bool {
        match wait {
            WaitOn::Operation(target) => self
                .state
                .operations
                .get(target)
                .map(|target_op| target_op.status() == OperationStatus::Completed)
                .unwrap_or(false),
            WaitOn::EventArrival => match kind {
                OperationKind::ActorDispatch(actor_id) => {
                    self.state.mailbox_for(actor_id).has_pending_arrival()
                }
                _ => false,
            },
            WaitOn::TimerFire(timer_id) => self.state.fired_timers.contains(timer_id),
            WaitOn::AnyOf(members) => members.iter().any(|member| self.check_wait(member, kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TraceHeader;
    use crate::strategy::RandomStrategy;
    use std::sync::atomic::AtomicU32;

    fn new_scheduler(max_steps: u64) -> Arc<Scheduler> {
        let state = RuntimeState::new(TraceHeader::new("random", 1, max_steps));
        Scheduler::new(state, Box::new(RandomStrategy::new(1)), max_steps)
    }

    #[tokio::test]
    async fn two_operations_interleave_to_completion() {
        let scheduler = new_scheduler(1_000);
        let order = Arc::new(Mutex::new(Vec::new()));

        let a_id = scheduler.register_operation(OperationKind::UserTask);
        let b_id = scheduler.register_operation(OperationKind::UserTask);

        let sched_a = Arc::clone(&scheduler);
        let order_a = Arc::clone(&order);
        let task_a = tokio::spawn(async move {
            sched_a.start_operation(a_id).await.unwrap();
            order_a.lock().push("a-start");
            sched_a.schedule_next(a_id).await.unwrap();
            order_a.lock().push("a-end");
            sched_a.complete_operation(a_id).unwrap();
        });

        let sched_b = Arc::clone(&scheduler);
        let order_b = Arc::clone(&order);
        let task_b = tokio::spawn(async move {
            sched_b.start_operation(b_id).await.unwrap();
            order_b.lock().push("b-start");
            sched_b.schedule_next(b_id).await.unwrap();
            order_b.lock().push("b-end");
            sched_b.complete_operation(b_id).unwrap();
        });

        task_a.await.unwrap();
        task_b.await.unwrap();

        assert_eq!(order.lock().len(), 4);
    }

    #[tokio::test]
    async fn deadlock_is_detected_when_both_operations_wait_on_each_other() {
        let scheduler = new_scheduler(1_000);
        let a_id = scheduler.register_operation(OperationKind::UserTask);
        let b_id = scheduler.register_operation(OperationKind::UserTask);

        let failures = Arc::new(AtomicU32::new(0));

        let sched_a = Arc::clone(&scheduler);
        let failures_a = Arc::clone(&failures);
        let task_a = tokio::spawn(async move {
            sched_a.start_operation(a_id).await.unwrap();
            if sched_a.wait_for(a_id, WaitOn::Operation(b_id)).await.is_err() {
                failures_a.fetch_add(1, Ordering::SeqCst);
            }
        });

        let sched_b = Arc::clone(&scheduler);
        let failures_b = Arc::clone(&failures);
        let task_b = tokio::spawn(async move {
            sched_b.start_operation(b_id).await.unwrap();
            if sched_b.wait_for(b_id, WaitOn::Operation(a_id)).await.is_err() {
                failures_b.fetch_add(1, Ordering::SeqCst);
            }
        });

        task_a.await.unwrap();
        task_b.await.unwrap();

        assert!(failures.load(Ordering::SeqCst) >= 1);
    }
}
