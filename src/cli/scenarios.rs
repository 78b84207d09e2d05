//! Built-in demonstration scenarios the `vigil` binary can run, so the
//! binary is self-contained without depending on some other crate's
//! actors. Library users embed [`crate::test_engine::TestEngine`] directly
//! against their own actors instead of going through this registry.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::actor::{spawn_actor, Actor, ActorContext};
use crate::event::{downcast_event, AnyEvent, Event};
use crate::scheduler::{Scheduler, SchedulerError};
use crate::timer::TimerService;
use crate::util::ActorId;

#[derive(Debug, Clone)]
struct Ping {
    from: ActorId,
}
impl Event for Ping {
    const EVENT_TYPE: &'static str = "Ping";
}

#[derive(Debug, Clone)]
struct Pong;
impl Event for Pong {
    const EVENT_TYPE: &'static str = "Pong";
}

struct Server;

#[async_trait]
impl Actor for Server {
    fn name(&self) -> &'static str {
        "Server"
    }

    async fn on_event(&mut self, ctx: &ActorContext, event: AnyEvent) -> Result<(), SchedulerError> {
        if let Some(ping) = downcast_event::<Ping>(event.as_ref()) {
            ctx.send(&ping.from, Pong);
        }
        Ok(())
    }
}

struct Client {
    server: ActorId,
    replies: Arc<AtomicU32>,
    turns: u32,
}

#[async_trait]
impl Actor for Client {
    fn name(&self) -> &'static str {
        "Client"
    }

    async fn on_start(&mut self, ctx: &ActorContext) -> Result<(), SchedulerError> {
        ctx.send(&self.server, Ping { from: ctx.actor_id().clone() });
        Ok(())
    }

    async fn on_event(&mut self, ctx: &ActorContext, event: AnyEvent) -> Result<(), SchedulerError> {
        if downcast_event::<Pong>(event.as_ref()).is_some() {
            let seen = self.replies.fetch_add(1, Ordering::SeqCst) + 1;
            if seen >= self.turns {
                ctx.send(ctx.actor_id(), crate::event::Halt);
            } else {
                ctx.send(&self.server, Ping { from: ctx.actor_id().clone() });
            }
        }
        Ok(())
    }
}

/// *Ping-Pong*: Client sends `Ping` to Server, Server replies `Pong`; after
/// five replies Client halts. Any fair strategy completes cleanly.
pub fn ping_pong(scheduler: Arc<Scheduler>, timers: Arc<TimerService>) -> Vec<tokio::task::JoinHandle<()>> {
    let server_id = ActorId::new("Server");
    let client_id = ActorId::new("Client");

    let server_handle = spawn_actor(
        Arc::clone(&scheduler),
        Arc::clone(&timers),
        server_id.clone(),
        Box::new(Server),
    );
    let client_handle = spawn_actor(
        scheduler,
        timers,
        client_id,
        Box::new(Client {
            server: server_id,
            replies: Arc::new(AtomicU32::new(0)),
            turns: 5,
        }),
    );

    vec![server_handle, client_handle]
}

/// Names of every scenario `lookup` can resolve, for `vigil list`.
pub const NAMES: &[&str] = &["ping-pong"];

/// Resolves a scenario name to its setup function. Returns `None` for an
/// unknown name.
pub fn lookup(name: &str) -> Option<fn(Arc<Scheduler>, Arc<TimerService>) -> Vec<tokio::task::JoinHandle<()>>> {
    match name {
        "ping-pong" => Some(ping_pong),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TraceHeader;
    use crate::scheduler::RuntimeState;
    use crate::strategy::RandomStrategy;

    #[tokio::test]
    async fn ping_pong_completes_without_error() {
        let state = RuntimeState::new(TraceHeader::new("random", 1, 1_000));
        let scheduler = Scheduler::new(state.clone(), Box::new(RandomStrategy::new(1)), 1_000);
        let timers = TimerService::new(Arc::clone(&scheduler));

        let handles = ping_pong(scheduler, timers);
        for handle in handles {
            let _ = handle.await;
        }

        assert!(state.take_first_error().is_none());
    }
}
