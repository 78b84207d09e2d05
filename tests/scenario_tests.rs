//! End-to-end scenarios run through the full [`TestEngine`], exercising the
//! scheduler, monitor engine, and timer service together the way a program
//! under test actually would.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use vigil_rt::event::Halt;
use vigil_rt::monitor::{Monitor, StateTemperature};
use vigil_rt::operation::OperationKind;
use vigil_rt::report::BugKind;
use vigil_rt::strategy::StrategyKind;
use vigil_rt::test_engine::{TestConfig, TestEngine};

mod ping_pong {
    use super::*;
    use vigil_rt::actor::{spawn_actor, Actor, ActorContext};
    use vigil_rt::event::{downcast_event, AnyEvent, Event};
    use vigil_rt::scheduler::{Scheduler, SchedulerError};
    use vigil_rt::timer::TimerService;
    use vigil_rt::util::ActorId;

    #[derive(Debug, Clone)]
    pub struct Ping {
        pub from: ActorId,
    }
    impl Event for Ping {
        const EVENT_TYPE: &'static str = "Ping";
    }

    #[derive(Debug, Clone)]
    pub struct Pong;
    impl Event for Pong {
        const EVENT_TYPE: &'static str = "Pong";
    }

    struct Server;

    #[async_trait::async_trait]
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
    }

    #[async_trait::async_trait]
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
                if seen >= 5 {
                    ctx.send(ctx.actor_id(), Halt);
                } else {
                    ctx.send(&self.server, Ping { from: ctx.actor_id().clone() });
                }
            }
            Ok(())
        }
    }

    pub fn setup(scheduler: Arc<Scheduler>, timers: Arc<TimerService>) -> Vec<tokio::task::JoinHandle<()>> {
        let server_id = ActorId::new("Server");
        let client_id = ActorId::new("Client");
        let server = spawn_actor(Arc::clone(&scheduler), Arc::clone(&timers), server_id.clone(), Box::new(Server));
        let client = spawn_actor(
            scheduler,
            timers,
            client_id,
            Box::new(Client { server: server_id, replies: Arc::new(AtomicU32::new(0)) }),
        );
        vec![server, client]
    }
}

/// Seed scenario 1: five ping/pong turns then the client halts. Any fair
/// strategy runs this cleanly to completion.
#[tokio::test]
async fn ping_pong_completes_without_a_bug() {
    let config = TestConfig::new(StrategyKind::Random).with_seed(7).with_iterations(20);
    let engine = TestEngine::new(config);

    let report = engine.run(|scheduler, timers| async move { ping_pong::setup(scheduler, timers) }).await;

    assert!(report.bug.is_none());
    assert_eq!(report.coverage.iterations_run, 20);
}

/// Seed scenario 2: an `Update` that races a `Delete` on the same account.
/// The program under test fails to check for a concurrent delete before
/// writing its result back, so under enough random interleavings the
/// scheduler finds an iteration where `Delete` lands between `Update`'s read
/// and its write.
#[tokio::test]
async fn account_race_is_found_within_a_hundred_iterations() {
    let config = TestConfig::new(StrategyKind::Random).with_seed(1).with_iterations(100).with_fail_on_first(true);
    let engine = TestEngine::new(config);

    let report = engine
        .run(|scheduler, _timers| async move {
            let account: Arc<Mutex<Option<u64>>> = Arc::new(Mutex::new(Some(100)));

            let update_account = Arc::clone(&account);
            let update_scheduler = Arc::clone(&scheduler);
            let update_id = scheduler.register_operation(OperationKind::UserTask);
            let update = tokio::spawn(async move {
                if update_scheduler.start_operation(update_id).await.is_err() {
                    return;
                }
                let observed = *update_account.lock().unwrap();
                let _ = update_scheduler.schedule_next(update_id).await;
                if observed.is_some() && update_account.lock().unwrap().is_none() {
                    update_scheduler.notify_assertion_failure(
                        "update wrote back to an account deleted mid-flight",
                    );
                } else {
                    *update_account.lock().unwrap() = Some(observed.unwrap_or(0) + 1);
                }
                let _ = update_scheduler.complete_operation(update_id);
            });

            let delete_account = Arc::clone(&account);
            let delete_scheduler = Arc::clone(&scheduler);
            let delete_id = scheduler.register_operation(OperationKind::UserTask);
            let delete = tokio::spawn(async move {
                if delete_scheduler.start_operation(delete_id).await.is_err() {
                    return;
                }
                let _ = delete_scheduler.schedule_next(delete_id).await;
                *delete_account.lock().unwrap() = None;
                let _ = delete_scheduler.complete_operation(delete_id);
            });

            vec![update, delete]
        })
        .await;

    assert!(report.bug.is_some(), "expected the race to surface within 100 iterations");
    assert!(matches!(report.bug.unwrap().kind, BugKind::UserAssertion { .. }));
}

/// Two operations that wait on each other form a cycle the scheduler can
/// never resolve, so the run must end as a deadlock.
#[tokio::test]
async fn mutual_wait_is_reported_as_deadlock() {
    let config = TestConfig::new(StrategyKind::Random).with_seed(3).with_iterations(1);
    let engine = TestEngine::new(config);

    let report = engine
        .run(|scheduler, _timers| async move {
            let a_id = scheduler.register_operation(OperationKind::UserTask);
            let b_id = scheduler.register_operation(OperationKind::UserTask);

            let a_scheduler = Arc::clone(&scheduler);
            let a = tokio::spawn(async move {
                if a_scheduler.start_operation(a_id).await.is_err() {
                    return;
                }
                let _ = a_scheduler
                    .wait_for(a_id, vigil_rt::operation::WaitOn::Operation(b_id))
                    .await;
                let _ = a_scheduler.complete_operation(a_id);
            });

            let b_scheduler = Arc::clone(&scheduler);
            let b = tokio::spawn(async move {
                if b_scheduler.start_operation(b_id).await.is_err() {
                    return;
                }
                let _ = b_scheduler
                    .wait_for(b_id, vigil_rt::operation::WaitOn::Operation(a_id))
                    .await;
                let _ = b_scheduler.complete_operation(b_id);
            });

            vec![a, b]
        })
        .await;

    assert!(matches!(report.bug.map(|b| b.kind), Some(BugKind::Deadlock { .. })));
}

struct UserCanAlwaysInput {
    computing: bool,
}

impl Monitor for UserCanAlwaysInput {
    fn name(&self) -> &'static str {
        "UserCanAlwaysInput"
    }

    fn current_state(&self) -> &'static str {
        if self.computing {
            "Computing"
        } else {
            "WaitingForUser"
        }
    }

    fn temperature(&self, state: &'static str) -> StateTemperature {
        match state {
            "Computing" => StateTemperature::Hot,
            "WaitingForUser" => StateTemperature::Cold,
            _ => StateTemperature::Neutral,
        }
    }

    fn on_event(&mut self, _event: &dyn vigil_rt::event::EventObject) -> Result<(), String> {
        // This program's handler never returns to `WaitingForUser` once
        // computation starts, which is the bug the monitor is meant to
        // catch.
        self.computing = true;
        Ok(())
    }
}

/// Seed scenario 5: a monitor that is supposed to alternate between hot and
/// cold states gets stuck hot because the handler never returns the program
/// to `WaitingForUser`. A fair schedule must flag this as a liveness bug
/// once the hot streak crosses its threshold.
#[tokio::test]
async fn stuck_computing_state_is_reported_as_liveness_violation() {
    let config = TestConfig::new(StrategyKind::Random).with_seed(1).with_iterations(1);
    let engine = TestEngine::new(config);

    let report = engine
        .run(|scheduler, _timers| async move {
            scheduler.register_monitor(Box::new(UserCanAlwaysInput { computing: false }), 5);
            let op_id = scheduler.register_operation(OperationKind::UserTask);
            let handle = tokio::spawn(async move {
                let _ = scheduler.start_operation(op_id).await;
                for _ in 0..10 {
                    if scheduler.notify_monitors(&Halt).is_err() {
                        break;
                    }
                    if scheduler.record_fair_step().is_err() {
                        break;
                    }
                }
                let _ = scheduler.complete_operation(op_id);
            });
            vec![handle]
        })
        .await;

    assert!(matches!(report.bug.map(|b| b.kind), Some(BugKind::LivenessViolation(_))));
}

/// Replay determinism: replaying a recorded trace against the same setup
/// reproduces the same bug.
#[tokio::test]
async fn replay_reproduces_a_recorded_deadlock() {
    let config = TestConfig::new(StrategyKind::Random).with_seed(11).with_iterations(1);
    let engine = TestEngine::new(config);

    let setup = |scheduler: Arc<vigil_rt::scheduler::Scheduler>, _timers: Arc<vigil_rt::timer::TimerService>| async move {
        let a_id = scheduler.register_operation(OperationKind::UserTask);
        let b_id = scheduler.register_operation(OperationKind::UserTask);

        let a_scheduler = Arc::clone(&scheduler);
        let a = tokio::spawn(async move {
            if a_scheduler.start_operation(a_id).await.is_err() {
                return;
            }
            let _ = a_scheduler.wait_for(a_id, vigil_rt::operation::WaitOn::Operation(b_id)).await;
            let _ = a_scheduler.complete_operation(a_id);
        });

        let b_scheduler = Arc::clone(&scheduler);
        let b = tokio::spawn(async move {
            if b_scheduler.start_operation(b_id).await.is_err() {
                return;
            }
            let _ = b_scheduler.wait_for(b_id, vigil_rt::operation::WaitOn::Operation(a_id)).await;
            let _ = b_scheduler.complete_operation(b_id);
        });

        vec![a, b]
    };

    let first = engine.run(setup).await;
    let bug = first.bug.expect("mutual wait always deadlocks");

    let replayed = TestEngine::replay(&bug.trace, setup).await;
    let replayed_bug = replayed.bug.expect("replay must reproduce the original bug");

    assert!(matches!(replayed_bug.kind, BugKind::Deadlock { .. }));
}
