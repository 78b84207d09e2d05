//! `TimerService`: models logical timers as ordinary scheduled operations
//! instead of real wall-clock waits, so the Strategy, not the OS clock,
//! decides exactly when a timer fires relative to everything else.
//!
//! Grounded on `supervisor::backoff`'s delay-as-a-value approach and
//! `mailbox::backpressure`'s "a pending condition is itself schedulable"
//! shape, replacing both with virtual time: a started timer is registered
//! as a `Timer` operation that becomes eligible the instant it is armed,
//! and the controlling Strategy is free to let it fire at any later step.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use tracing::debug;

// Layer 3: Internal module imports
use crate::event::{Envelope, TimerElapsed};
use crate::operation::OperationKind;
use crate::scheduler::Scheduler;
use crate::timer::types::{TimerHandle, TimerInfo};
use crate::util::{ActorId, TimerId};

/// Owns every timer armed during one iteration.
pub struct TimerService {
    scheduler: Arc<Scheduler>,
    timers: DashMap<TimerId, (TimerInfo, Arc<AtomicBool>, tokio::task::JoinHandle<()>)>,
}

impl TimerService {
    pub fn new(scheduler: Arc<Scheduler>) -> Arc<Self> {
        Arc::new(Self {
            scheduler,
            timers: DashMap::new(),
        })
    }

    /// Arms a timer for `owner`. If `periodic` is true it keeps re-arming
    /// itself (delivering `TimerElapsed` again) after every fire, until
    /// [`TimerService::stop_timer`] is called.
    pub fn start_timer(self: &Arc<Self>, owner: ActorId, periodic: bool) -> TimerHandle {
        let timer_id = TimerId::new();
        let armed = Arc::new(AtomicBool::new(true));

        let scheduler = Arc::clone(&self.scheduler);
        let task_armed = Arc::clone(&armed);
        let handle = tokio::spawn(async move {
            let armed = task_armed;
            loop {
                if !armed.load(Ordering::SeqCst) {
                    return;
                }
                let op_id = scheduler.register_operation(OperationKind::Timer(timer_id));
                if scheduler.start_operation(op_id).await.is_err() {
                    return;
                }
                if !armed.load(Ordering::SeqCst) {
                    let _ = scheduler.complete_operation(op_id);
                    return;
                }

                let event = TimerElapsed { timer_id };
                scheduler.state().mark_timer_fired(timer_id);
                if scheduler.notify_monitors(&event).is_err() {
                    let _ = scheduler.complete_operation(op_id);
                    return;
                }
                let mailbox = scheduler.state().mailbox_for(&owner);
                let _ = mailbox.enqueue(Envelope::new(event), None, None);
                debug!(?timer_id, "timer fired");

                if scheduler.complete_operation(op_id).is_err() || !periodic {
                    return;
                }
            }
        });

        self.timers.insert(
            timer_id,
            (
                TimerInfo {
                    timer_id,
                    owner,
                    periodic,
                },
                armed,
                handle,
            ),
        );

        TimerHandle { timer_id }
    }

    /// Disarms a timer. A periodic timer's background task notices on its
    /// next loop iteration and exits; an already-fired one-shot timer is a
    /// no-op.
    pub fn stop_timer(&self, handle: TimerHandle) {
        if let Some(entry) = self.timers.get(&handle.timer_id) {
            entry.value().1.store(false, Ordering::SeqCst);
        }
    }

    /// True if a timer is still armed (not yet stopped).
    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.timers
            .get(&handle.timer_id)
            .map(|e| e.value().1.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Disarms every timer and aborts its background task. Called once an
    /// iteration's actors have all finished, so no periodic timer keeps a
    /// test run alive past the point any actor could observe it firing.
    pub fn shutdown(&self) {
        for entry in self.timers.iter() {
            let (_, armed, handle) = entry.value();
            armed.store(false, Ordering::SeqCst);
            handle.abort();
        }
    }
}
