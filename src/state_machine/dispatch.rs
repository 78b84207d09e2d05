//! Spawns a state machine's dispatch loop: one mailbox drain cycle between
//! scheduling points, with ignore/defer checks, handler lookup via the
//! current state stack, and deferred-event re-admission on any state
//! change.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::ActorContext;
use crate::event::{Envelope, EventObject};
use crate::operation::OperationKind;
use crate::random::RandomnessService;
use crate::scheduler::Scheduler;
use crate::state_machine::traits::{MachineObserver, State};
use crate::state_machine::transition::Transition;
use crate::timer::TimerService;
use crate::util::ActorId;

/// Registers and runs a state machine's dispatch loop as a scheduled
/// operation, starting in `initial`.
pub fn spawn_state_machine(
    scheduler: Arc<Scheduler>,
    timers: Arc<TimerService>,
    actor_id: ActorId,
    initial: Box<dyn State>,
    mut observer: Box<dyn MachineObserver>,
) -> tokio::task::JoinHandle<()> {
    let operation_id =
        scheduler.register_operation(OperationKind::ActorDispatch(actor_id.clone()));
    let mailbox = scheduler.state().mailbox_for(&actor_id);

    tokio::spawn(async move {
        let random = RandomnessService::controlled(Arc::clone(&scheduler), operation_id);
        let ctx = ActorContext {
            actor_id: actor_id.clone(),
            operation_id,
            scheduler: Arc::clone(&scheduler),
            mailbox: Arc::clone(&mailbox),
            timers,
            random,
        };

        let mut stack: Vec<Box<dyn State>> = vec![initial];
        if let Some(initial) = stack.last_mut() {
            if let Err(err) = initial.on_entry(&ctx).await {
                observer.on_exception(&ctx, &err).await;
                let _ = scheduler.complete_operation(operation_id);
                return;
            }
        }

        if scheduler.start_operation(operation_id).await.is_err() {
            return;
        }

        'dispatch: loop {
            let envelope = match ctx.receive_envelope().await {
                Ok(envelope) => envelope,
                Err(_) => break,
            };

            let mut pending = Some(envelope);
            while let Some(envelope) = pending.take() {
                let event_type = envelope.event_type();
                let Some(current) = stack.last() else {
                    break 'dispatch;
                };

                if current.ignore_set().contains(&event_type) {
                    observer.on_event_ignored(&ctx, event_type).await;
                    continue 'dispatch;
                }
                if current.defer_set().contains(&event_type) {
                    observer.on_event_deferred(&ctx, event_type).await;
                    ctx.defer(envelope);
                    continue 'dispatch;
                }

                let Some(current) = stack.last_mut() else {
                    break 'dispatch;
                };
                let transition = match current.on_event(&ctx, envelope.event).await {
                    Ok(t) => t,
                    Err(err) => {
                        observer.on_exception(&ctx, &err).await;
                        break 'dispatch;
                    }
                };

                let mut changed_state = true;
                match transition {
                    Transition::None => changed_state = false,
                    Transition::Goto(new_state) => {
                        if let Some(mut old) = stack.pop() {
                            if let Err(err) = old.on_exit(&ctx).await {
                                observer.on_exception(&ctx, &err).await;
                                break 'dispatch;
                            }
                        }
                        stack.push(new_state);
                        if let Some(entered) = stack.last_mut() {
                            if let Err(err) = entered.on_entry(&ctx).await {
                                observer.on_exception(&ctx, &err).await;
                                break 'dispatch;
                            }
                        }
                    }
                    Transition::Push(new_state) => {
                        stack.push(new_state);
                        if let Some(entered) = stack.last_mut() {
                            if let Err(err) = entered.on_entry(&ctx).await {
                                observer.on_exception(&ctx, &err).await;
                                break 'dispatch;
                            }
                        }
                    }
                    Transition::Pop => {
                        if let Some(mut old) = stack.pop() {
                            if let Err(err) = old.on_exit(&ctx).await {
                                observer.on_exception(&ctx, &err).await;
                                break 'dispatch;
                            }
                        }
                        if stack.is_empty() {
                            break 'dispatch;
                        }
                    }
                    Transition::Raise(event) => {
                        changed_state = false;
                        pending = Some(Envelope::from_boxed(event));
                    }
                    Transition::Halt => {
                        observer.on_halt(&ctx).await;
                        mailbox.close();
                        break 'dispatch;
                    }
                    Transition::Unhandled => {
                        changed_state = false;
                        if let Err(err) = observer.on_unhandled_event(&ctx, event_type).await {
                            observer.on_exception(&ctx, &err).await;
                            break 'dispatch;
                        }
                    }
                }

                if changed_state {
                    if let Some(current) = stack.last() {
                        let still_deferred_types = current.defer_set().to_vec();
                        ctx.reclaim_deferred(|envelope| {
                            still_deferred_types.contains(&envelope.event_type())
                        });
                    }
                }

                if scheduler.record_fair_step().is_err() {
                    break 'dispatch;
                }
            }
        }

        let _ = scheduler.complete_operation(operation_id);
    })
}
