//! `ActorContext`: the handle an actor uses to reach everything the
//! scheduler mediates — sending, receiving, timers, randomness, and
//! monitor notifications.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::event::{downcast_event, AnyEvent, Envelope, Event, EventObject};
use crate::mailbox::{ControlledMailbox, EnqueueStatus};
use crate::operation::WaitOn;
use crate::random::RandomnessService;
use crate::scheduler::{Scheduler, SchedulerError};
use crate::timer::{TimerHandle, TimerService};
use crate::util::{ActorId, OperationId};

/// Everything an actor or state machine needs to act through the scheduler
/// instead of directly touching shared state.
pub struct ActorContext {
    pub(crate) actor_id: ActorId,
    pub(crate) operation_id: OperationId,
    pub(crate) scheduler: Arc<Scheduler>,
    pub(crate) mailbox: Arc<ControlledMailbox>,
    pub(crate) timers: Arc<TimerService>,
    pub(crate) random: RandomnessService,
}

impl ActorContext {
    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    pub fn operation_id(&self) -> OperationId {
        self.operation_id
    }

    /// Sends `event` to `target`'s mailbox, attributing this actor as the
    /// sender. If the send synchronously satisfies a receive-await `target`
    /// already had installed, `target`'s dispatch operation is re-enabled
    /// immediately rather than waiting for the scheduler's next scheduling
    /// point to notice.
    pub fn send<E: Event>(&self, target: &ActorId, event: E) {
        let mailbox = self.scheduler.state().mailbox_for(target);
        let envelope = Envelope::new(event).with_sender(self.actor_id.clone());
        match mailbox.enqueue(envelope.event, envelope.sender, envelope.group) {
            Ok(EnqueueStatus::AcceptedWakesReceive) => self.scheduler.reenable_actor(target),
            Ok(EnqueueStatus::Accepted) | Ok(EnqueueStatus::Rejected(_)) | Err(_) => {}
        }
    }

    /// Takes the next envelope off this actor's own mailbox, parking on
    /// `EventArrival` if it is empty. Never returns before an event has
    /// actually arrived under the controlled scheduler.
    pub async fn receive_envelope(&self) -> Result<Envelope, SchedulerError> {
        loop {
            if let Some(envelope) = self.mailbox.dequeue() {
                return Ok(envelope);
            }
            self.scheduler
                .wait_for(self.operation_id, WaitOn::EventArrival)
                .await?;
        }
    }

    /// Takes the next event off the mailbox, discarding routing metadata.
    pub async fn receive_any(&self) -> Result<AnyEvent, SchedulerError> {
        Ok(self.receive_envelope().await?.event)
    }

    /// Restores deferred events that no longer match `still_deferred`, in
    /// FIFO order, to the front of the mailbox.
    pub fn reclaim_deferred(&self, still_deferred: impl FnMut(&Envelope) -> bool) {
        let mut still_deferred = still_deferred;
        self.mailbox.reclaim_deferred(|envelope| !still_deferred(envelope));
    }

    /// Defers `envelope` until the next state change re-admits it.
    pub fn defer(&self, envelope: Envelope) {
        self.mailbox.defer(envelope);
    }

    /// Takes the next event of type `T` off the mailbox, deferring any
    /// non-matching event encountered at the head until a match arrives.
    pub async fn receive<T: Event>(&self) -> Result<T, SchedulerError> {
        loop {
            match self.mailbox.install_receive(vec![T::EVENT_TYPE], None)? {
                Some(envelope) => {
                    return downcast_event::<T>(envelope.event.as_ref())
                        .cloned()
                        .ok_or_else(|| {
                            self.assertion_failure("receive type filter matched wrong concrete type")
                        });
                }
                None => {
                    self.scheduler
                        .wait_for(self.operation_id, WaitOn::EventArrival)
                        .await?;
                    if let Some(envelope) = self.mailbox.take_delivered() {
                        return downcast_event::<T>(envelope.event.as_ref())
                            .cloned()
                            .ok_or_else(|| {
                                self.assertion_failure(
                                    "receive type filter matched wrong concrete type",
                                )
                            });
                    }
                }
            }
        }
    }

    /// A voluntary scheduling point with no side effect other than letting
    /// another enabled operation run.
    pub async fn yield_now(&self) -> Result<(), SchedulerError> {
        self.scheduler.schedule_next(self.operation_id).await
    }

    /// Arms a timer owned by this actor.
    pub fn start_timer(&self, periodic: bool) -> TimerHandle {
        self.timers.start_timer(self.actor_id.clone(), periodic)
    }

    /// Disarms a previously started timer.
    pub fn stop_timer(&self, handle: TimerHandle) {
        self.timers.stop_timer(handle);
    }

    /// The controlled source of "random" choices for this actor.
    pub fn random(&self) -> &RandomnessService {
        &self.random
    }

    /// Delivers `event` to every registered monitor.
    pub fn notify_monitor(&self, event: &dyn EventObject) -> Result<(), SchedulerError> {
        self.scheduler.notify_monitors(event)
    }

    /// Raises a user assertion failure, ending the iteration.
    pub fn assertion_failure(&self, message: impl Into<String>) -> SchedulerError {
        self.scheduler.notify_assertion_failure(message)
    }
}
