//! Spawns an actor's dispatch loop as a scheduled [`Operation`](crate::operation::Operation).
//!
//! Grounded on the old dispatch loop's "own mailbox, pull one message at a
//! time, run lifecycle callbacks" shape, rebuilt around the controlled
//! scheduler: every mailbox pull and receive-await is itself a scheduling
//! point instead of an `.await` on a channel the OS scheduler resolves.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::context::ActorContext;
use crate::actor::traits::Actor;
use crate::event::{EventObject, Halt};
use crate::operation::OperationKind;
use crate::random::RandomnessService;
use crate::scheduler::Scheduler;
use crate::timer::TimerService;
use crate::util::ActorId;

/// Registers `actor_id`'s dispatch loop as a new operation and spawns it on
/// the tokio runtime. Returns once the actor has been registered; the
/// actual dispatch loop runs as a background task synchronized entirely
/// through `scheduler`.
pub fn spawn_actor(
    scheduler: Arc<Scheduler>,
    timers: Arc<TimerService>,
    actor_id: ActorId,
    mut actor: Box<dyn Actor>,
) -> tokio::task::JoinHandle<()> {
    let operation_id = scheduler.register_operation(OperationKind::ActorDispatch(actor_id.clone()));
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

        if scheduler.start_operation(operation_id).await.is_err() {
            return;
        }

        if let Err(err) = actor.on_start(&ctx).await {
            actor.on_exception(&ctx, &err).await;
            let _ = scheduler.complete_operation(operation_id);
            return;
        }

        loop {
            let event = match ctx.receive_any().await {
                Ok(event) => event,
                Err(_) => break,
            };

            if event.as_any().downcast_ref::<Halt>().is_some() {
                mailbox.close();
                break;
            }

            match actor.on_event(&ctx, event).await {
                Ok(()) => {
                    if scheduler.record_fair_step().is_err() {
                        break;
                    }
                }
                Err(err) => {
                    actor.on_exception(&ctx, &err).await;
                    break;
                }
            }
        }

        let _ = actor.on_stop(&ctx).await;
        let _ = scheduler.complete_operation(operation_id);
    })
}
