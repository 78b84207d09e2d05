//! `Operation`, its status, and what it can be waiting on.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tokio::sync::Notify;

// Layer 3: Internal module imports
use crate::util::{ActorId, MonitorId, OperationId, TimerId};

/// What kind of schedulable work an [`Operation`] represents.
#[derive(Debug, Clone)]
pub enum OperationKind {
    /// An actor's dispatch loop (plain actor or state machine).
    ActorDispatch(ActorId),
    /// A user-spawned test task, not owned by any actor (e.g. the test
    /// engine's top-level iteration driver, or a helper task the test
    /// spawns to assert on cross-actor state).
    UserTask,
    /// A monitor's own lifecycle operation, used only for the end-of-
    /// iteration liveness check — ordinary `Monitor::on_event` calls are
    /// synchronous extensions of the caller's operation and never get an
    /// `Operation` of their own.
    Monitor(MonitorId),
    /// The synthetic operation a logical timer occupies while armed,
    /// representing its eventual `fire` as an ordinary scheduling choice
    ///.
    Timer(TimerId),
}

/// Lifecycle status of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    /// Registered but not yet started.
    Created,
    /// Runnable: eligible to be chosen by the Strategy.
    Enabled,
    /// Suspended at a scheduling point, waiting on a dependency.
    Paused,
    /// Finished; never becomes runnable again.
    Completed,
}

/// What a `Paused` operation is waiting on before it becomes `Enabled`
/// again.
#[derive(Debug, Clone)]
pub enum WaitOn {
    /// Waiting for another operation to reach `Completed`.
    Operation(OperationId),
    /// Waiting for a matching event to arrive at its mailbox
    /// (`ReceiveEventAsync`).
    EventArrival,
    /// Waiting for a specific timer to fire.
    TimerFire(TimerId),
    /// Waiting on any one of several dependencies (deadlock detection
    /// treats this as satisfied once any member is satisfied).
    AnyOf(Vec<WaitOn>),
}

/// One unit of schedulable work.
///
/// `Operation` owns no business logic itself — it is a handle the scheduler
/// uses to track status and to hand control to the right task via
/// [`Operation::wake`].
pub struct Operation {
    id: OperationId,
    kind: OperationKind,
    status: OperationStatus,
    waiting_on: Option<WaitOn>,
    wake: Arc<Notify>,
}

impl Operation {
    /// Creates a new operation in the `Created` state.
    pub fn new(kind: OperationKind) -> Self {
        Self {
            id: OperationId::new(),
            kind,
            status: OperationStatus::Created,
            waiting_on: None,
            wake: Arc::new(Notify::new()),
        }
    }

    /// The operation's stable id.
    pub fn id(&self) -> OperationId {
        self.id
    }

    /// What kind of work this operation represents.
    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    /// Current lifecycle status.
    pub fn status(&self) -> OperationStatus {
        self.status
    }

    /// What the operation is waiting on, if paused.
    pub fn waiting_on(&self) -> Option<&WaitOn> {
        self.waiting_on.as_ref()
    }

    /// Marks the operation runnable, clearing any wait dependency.
    pub fn mark_enabled(&mut self) {
        self.status = OperationStatus::Enabled;
        self.waiting_on = None;
    }

    /// Marks the operation paused, recording what it is waiting on.
    pub fn mark_paused(&mut self, waiting_on: WaitOn) {
        self.status = OperationStatus::Paused;
        self.waiting_on = Some(waiting_on);
    }

    /// Marks the operation finished. Terminal: never becomes runnable
    /// again.
    pub fn mark_completed(&mut self) {
        self.status = OperationStatus::Completed;
        self.waiting_on = None;
    }

    /// A cloneable handle to the wake primitive, given to the task this
    /// operation represents so it can park itself between scheduling
    /// points.
    pub fn wake_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.wake)
    }

    /// Signals the operation's task to resume. Only the scheduler calls
    /// this — user code never reaches a wake primitive directly.
    pub fn wake(&self) {
        self.wake.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_operation_starts_created() {
        let op = Operation::new(OperationKind::UserTask);
        assert_eq!(op.status(), OperationStatus::Created);
        assert!(op.waiting_on().is_none());
    }

    #[test]
    fn pause_then_enable_clears_wait_dependency() {
        let mut op = Operation::new(OperationKind::ActorDispatch(ActorId::new("Client")));
        op.mark_paused(WaitOn::EventArrival);
        assert_eq!(op.status(), OperationStatus::Paused);
        assert!(op.waiting_on().is_some());

        op.mark_enabled();
        assert_eq!(op.status(), OperationStatus::Enabled);
        assert!(op.waiting_on().is_none());
    }

    #[test]
    fn completed_is_terminal_in_practice() {
        let mut op = Operation::new(OperationKind::UserTask);
        op.mark_completed();
        assert_eq!(op.status(), OperationStatus::Completed);
    }
}
