//! `TestEngine`: the iteration driver. Builds a fresh [`RuntimeState`] and
//! [`Scheduler`] per iteration, hands them to a user-supplied setup
//! closure, waits for every spawned operation to finish, and turns the
//! first error recorded (if any) into a [`BugReport`].
//!
//! Grounded on `system::actor_system::ActorSystem`'s single owning loop,
//! generalized from "one long-lived process" to "tear down and rebuild
//! between iterations", matching [`RuntimeState`]'s own doc comment.

// Layer 1: Standard library imports
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

// Layer 3: Internal module imports
use crate::monitor::SafetyViolation;
use crate::report::{BugKind, BugReport, CoverageReport, CoverageTracker, ScheduleFingerprint, Trace, TraceHeader};
use crate::scheduler::{RuntimeState, Scheduler, SchedulerError};
use crate::strategy::{ReplayStrategy, Strategy};
use crate::test_engine::config::TestConfig;
use crate::timer::TimerService;

/// Everything a completed run hands back: coverage statistics, plus the
/// first confirmed bug if one was found.
#[derive(Debug, Clone)]
pub struct TestRunReport {
    pub coverage: CoverageReport,
    pub bug: Option<BugReport>,
}

/// Drives a configured number of iterations of a program under test.
pub struct TestEngine {
    config: TestConfig,
}

impl TestEngine {
    pub fn new(config: TestConfig) -> Self {
        Self { config }
    }

    /// Runs iterations until either the configured count is reached, the
    /// strategy's search space is exhausted (DFS backtracking), or (when
    /// `fail_on_first` is set) a bug is confirmed.
    ///
    /// `setup` registers the program under test's actors, state machines,
    /// and monitors against the fresh `Scheduler`/`TimerService` it is
    /// handed, and returns the join handles of every operation it spawned
    /// so the engine can wait for the iteration to settle.
    pub async fn run<F, Fut>(&self, setup: F) -> TestRunReport
    where
        F: Fn(Arc<Scheduler>, Arc<TimerService>) -> Fut,
        Fut: Future<Output = Vec<JoinHandle<()>>>,
    {
        let strategy: Arc<Mutex<Box<dyn Strategy>>> =
            Arc::new(Mutex::new(self.config.strategy.build(self.config.seed)));
        let mut tracker = CoverageTracker::new();
        let mut bug: Option<BugReport> = None;

        let mut iteration = 0u64;
        while iteration < self.config.iterations {
            if !strategy.lock().new_iteration(iteration) {
                info!(iteration, "strategy exhausted its search space");
                break;
            }

            let strategy_name = strategy.lock().name().to_string();
            let header = TraceHeader::new(strategy_name, self.config.seed, self.config.max_steps);
            let state = RuntimeState::new(header);
            let scheduler = Scheduler::with_shared_strategy(
                Arc::clone(&state),
                Arc::clone(&strategy),
                self.config.max_steps,
            );
            let timers = TimerService::new(Arc::clone(&scheduler));

            let handles = setup(Arc::clone(&scheduler), Arc::clone(&timers)).await;
            for handle in handles {
                let _ = handle.await;
            }
            timers.shutdown();

            let trace = state.trace.lock().clone();
            tracker.record_iteration(fingerprint_trace(&trace));

            if let Some(err) = state.take_first_error() {
                if err.is_inconclusive() {
                    warn!(iteration, "iteration ended inconclusively: {err}");
                    tracker.record_inconclusive();
                } else {
                    error!(iteration, "bug found: {err}");
                    tracker.record_bug();
                    let step = state.step_count();
                    let report = BugReport::new(bug_kind_from_error(err), iteration, step, trace);
                    let stop = self.config.fail_on_first;
                    bug = Some(report);
                    if stop {
                        break;
                    }
                }
            }

            iteration += 1;
        }

        TestRunReport {
            coverage: tracker.finish(),
            bug,
        }
    }

    /// Deterministically replays a previously recorded trace against the
    /// same setup closure used to produce it. Always exactly one
    /// iteration; a [`SchedulerError::ReplayDivergence`] surfaces the
    /// recorded and live operation ids at the step where they first
    /// disagreed.
    pub async fn replay<F, Fut>(recorded: &Trace, setup: F) -> TestRunReport
    where
        F: Fn(Arc<Scheduler>, Arc<TimerService>) -> Fut,
        Fut: Future<Output = Vec<JoinHandle<()>>>,
    {
        let mut tracker = CoverageTracker::new();
        let strategy: Arc<Mutex<Box<dyn Strategy>>> =
            Arc::new(Mutex::new(Box::new(ReplayStrategy::from_trace(recorded))));

        let header = recorded.header.clone();
        let max_steps = header.step_bound;
        let state = RuntimeState::new(header);
        let scheduler = Scheduler::with_shared_strategy(Arc::clone(&state), strategy, max_steps);
        let timers = TimerService::new(Arc::clone(&scheduler));

        let handles = setup(Arc::clone(&scheduler), Arc::clone(&timers)).await;
        for handle in handles {
            let _ = handle.await;
        }
        timers.shutdown();

        let trace = state.trace.lock().clone();
        tracker.record_iteration(fingerprint_trace(&trace));

        let bug = match state.take_first_error() {
            Some(err) if err.is_inconclusive() => {
                tracker.record_inconclusive();
                None
            }
            Some(err) => {
                tracker.record_bug();
                let step = state.step_count();
                Some(BugReport::new(bug_kind_from_error(err), 0, step, trace))
            }
            None => None,
        };

        TestRunReport {
            coverage: tracker.finish(),
            bug,
        }
    }
}

/// A coarse fingerprint of the operation-pick sequence, used only to
/// dedupe how many distinct schedules a run actually explored.
fn fingerprint_trace(trace: &Trace) -> ScheduleFingerprint {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for record in trace.records() {
        record.op_id.hash(&mut hasher);
        record.random_bits.hash(&mut hasher);
    }
    hasher.finish()
}

fn bug_kind_from_error(err: SchedulerError) -> BugKind {
    match err {
        SchedulerError::Deadlock { paused_operations } => BugKind::Deadlock { paused_operations },
        SchedulerError::UserAssertionFailed { message } => BugKind::UserAssertion { message },
        SchedulerError::MonitorSafetyViolation {
            monitor,
            monitor_name,
            message,
        } => BugKind::SafetyViolation(SafetyViolation {
            monitor,
            monitor_name,
            message,
        }),
        SchedulerError::MonitorLivenessViolation {
            monitor,
            monitor_name,
            state,
            hot_steps,
            threshold,
        } => BugKind::LivenessViolation(crate::monitor::LivenessViolation {
            monitor,
            monitor_name,
            state,
            hot_steps,
            threshold,
        }),
        SchedulerError::UncontrolledInvocation { operation, method } => {
            BugKind::UncontrolledInvocation { operation, method }
        }
        SchedulerError::ReplayDivergence { step, recorded } => {
            BugKind::ReplayDivergence { step, recorded }
        }
        SchedulerError::StepBoundExceeded { .. } | SchedulerError::Cancelled => {
            unreachable!("inconclusive and cancellation errors never reach bug_kind_from_error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Halt;
    use crate::monitor::{Monitor, StateTemperature};
    use crate::operation::OperationKind;

    #[tokio::test]
    async fn clean_run_reports_no_bug() {
        let config = TestConfig::new(crate::strategy::StrategyKind::Random)
            .with_seed(1)
            .with_iterations(3)
            .with_max_steps(100);
        let engine = TestEngine::new(config);

        let report = engine
            .run(|scheduler, _timers| async move {
                let op_id = scheduler.register_operation(OperationKind::UserTask);
                let handle = tokio::spawn(async move {
                    let _ = scheduler.start_operation(op_id).await;
                    let _ = scheduler.complete_operation(op_id);
                });
                vec![handle]
            })
            .await;

        assert!(report.bug.is_none());
        assert_eq!(report.coverage.iterations_run, 3);
    }

    struct AlwaysHot;

    impl Monitor for AlwaysHot {
        fn name(&self) -> &'static str {
            "AlwaysHot"
        }

        fn current_state(&self) -> &'static str {
            "hot"
        }

        fn temperature(&self, _state: &'static str) -> StateTemperature {
            StateTemperature::Hot
        }

        fn on_event(&mut self, _event: &dyn crate::event::EventObject) -> Result<(), String> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn liveness_violation_surfaces_as_bug() {
        let config = TestConfig::new(crate::strategy::StrategyKind::Random)
            .with_seed(1)
            .with_iterations(1)
            .with_max_steps(1_000)
            .with_fail_on_first(true);
        let engine = TestEngine::new(config);

        let report = engine
            .run(|scheduler, _timers| async move {
                scheduler.register_monitor(Box::new(AlwaysHot), 2);
                let op_id = scheduler.register_operation(OperationKind::UserTask);
                let handle = tokio::spawn(async move {
                    let _ = scheduler.start_operation(op_id).await;
                    for _ in 0..5 {
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

        assert!(matches!(
            report.bug.map(|b| b.kind),
            Some(BugKind::LivenessViolation(_))
        ));
    }
}
