//! Dispatches parsed CLI arguments to the test engine and maps the result
//! onto the process exit codes this binary documents: `0` clean, `1` bug
//! found, `2` configuration/tooling error, `3` uncontrolled nondeterminism
//! detected in the program under test.

// Layer 1: Standard library imports
use std::fs;

// Layer 2: Third-party crate imports
use tracing::info;

// Layer 3: Internal module imports
use crate::cli::args::{Commands, ReplayArgs, TestArgs};
use crate::cli::scenarios;
use crate::error::VigilError;
use crate::report::Trace;
use crate::test_engine::{TestConfig, TestEngine};

pub async fn dispatch(command: Commands) -> Result<i32, VigilError> {
    match command {
        Commands::Test(args) => run_test(args).await,
        Commands::Replay(args) => run_replay(args).await,
        Commands::List => {
            for name in scenarios::NAMES {
                println!("{name}");
            }
            Ok(0)
        }
    }
}

async fn run_test(args: TestArgs) -> Result<i32, VigilError> {
    let setup = scenarios::lookup(&args.scenario)
        .ok_or_else(|| VigilError::UnknownTarget(args.scenario.clone()))?;

    let config = TestConfig::new(args.strategy)
        .with_seed(args.seed)
        .with_iterations(args.iterations)
        .with_max_steps(args.max_steps)
        .with_liveness_threshold(args.liveness_threshold)
        .with_fail_on_first(!args.no_fail_on_first);

    let engine = TestEngine::new(config);
    let report = engine
        .run(|scheduler, timers| async move { setup(scheduler, timers) })
        .await;

    info!(?report.coverage, "run complete");

    match report.bug {
        Some(bug) => {
            if let Some(path) = args.trace_out {
                let json = bug.trace.to_json().map_err(|source| VigilError::Serde {
                    path: path.clone(),
                    source,
                })?;
                fs::write(&path, json).map_err(|source| VigilError::Io {
                    path: path.clone(),
                    source,
                })?;
            }
            println!("bug found at iteration {} step {}: {:?}", bug.iteration, bug.step, bug.kind);
            Ok(1)
        }
        None => {
            println!(
                "{} iterations, {} distinct schedules, no bug found",
                report.coverage.iterations_run, report.coverage.distinct_schedules
            );
            Ok(0)
        }
    }
}

async fn run_replay(args: ReplayArgs) -> Result<i32, VigilError> {
    let setup = scenarios::lookup(&args.scenario)
        .ok_or_else(|| VigilError::UnknownTarget(args.scenario.clone()))?;

    let json = fs::read_to_string(&args.trace_file).map_err(|source| VigilError::Io {
        path: args.trace_file.clone(),
        source,
    })?;
    let trace = Trace::from_json(&json).map_err(|source| VigilError::Serde {
        path: args.trace_file.clone(),
        source,
    })?;

    let report = TestEngine::replay(&trace, |scheduler, timers| async move { setup(scheduler, timers) }).await;

    match report.bug {
        Some(bug) => {
            println!("reproduced at step {}: {:?}", bug.step, bug.kind);
            Ok(1)
        }
        None => {
            println!("trace replayed cleanly: bug did not reproduce");
            Ok(0)
        }
    }
}
