use std::{
    any::Any,
    panic::AssertUnwindSafe,
    sync::Arc,
    time::{Duration, Instant},
};

use futures::FutureExt as _;
use thiserror::Error;
use tokio::{task::JoinSet, time::timeout};
use tracing::{debug, info, warn};

use super::report::{RunRecord, RunReport};
use crate::scenario::{Scenario, Workload, workload::RunContext};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("run {index} of workload '{workload}' failed: {message}")]
    RunFailed {
        workload: String,
        index: usize,
        message: String,
    },
    #[error("workload task failed: {0}")]
    Join(String),
}

/// Executes a [`Scenario`]: every workload runs `iterations` times, with at
/// most `concurrency` runs in flight. Each run gets its own task and its own
/// [`RunContext`], so runs never share mutable state.
#[derive(Debug, Default)]
pub struct Runner;

impl Runner {
    /// Drives every scheduled run to completion and returns the report.
    ///
    /// Failed runs are recorded in the report; the call itself only fails
    /// when `stop_on_failure` is set or a task could not be joined.
    pub async fn run(scenario: &Scenario) -> Result<RunReport, ScenarioError> {
        let started = Instant::now();
        let concurrency = scenario.concurrency().get();
        let mut pending = Self::schedule(scenario).into_iter();
        let mut in_flight = JoinSet::new();
        let mut records = Vec::with_capacity(scenario.total_runs());

        info!(
            runs = scenario.total_runs(),
            concurrency, "starting scenario runs"
        );

        loop {
            while in_flight.len() < concurrency {
                let Some((workload, index)) = pending.next() else {
                    break;
                };
                in_flight.spawn(execute_run(workload, index, scenario.run_timeout()));
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            let record = match joined {
                Ok(record) => record,
                Err(join_err) if join_err.is_cancelled() => continue,
                Err(join_err) => {
                    in_flight.abort_all();
                    drain(&mut in_flight).await;
                    return Err(ScenarioError::Join(join_err.to_string()));
                }
            };

            if scenario.stop_on_failure() {
                if let Some(message) = record.error.clone() {
                    warn!(
                        workload = %record.workload,
                        index = record.index,
                        "run failed; aborting remaining runs"
                    );
                    in_flight.abort_all();
                    drain(&mut in_flight).await;
                    return Err(ScenarioError::RunFailed {
                        workload: record.workload,
                        index: record.index,
                        message,
                    });
                }
            }

            records.push(record);
        }

        records.sort_by(|a, b| a.workload.cmp(&b.workload).then(a.index.cmp(&b.index)));
        let report = RunReport::new(records, started.elapsed());
        info!(
            succeeded = report.successes(),
            failed = report.failures(),
            elapsed_ms = report.elapsed().as_millis(),
            "scenario runs finished"
        );
        Ok(report)
    }

    /// Interleaves workloads so that concurrent runs mix them evenly.
    fn schedule(scenario: &Scenario) -> Vec<(Arc<dyn Workload>, usize)> {
        (0..scenario.iterations().get())
            .flat_map(|index| {
                scenario
                    .workloads()
                    .iter()
                    .map(move |workload| (Arc::clone(workload), index))
            })
            .collect()
    }
}

async fn execute_run(workload: Arc<dyn Workload>, index: usize, limit: Duration) -> RunRecord {
    let name = workload.name().to_owned();
    let started = Instant::now();
    let mut ctx = RunContext::new(index);
    debug!(workload = %name, index, "run started");

    let outcome = AssertUnwindSafe(timeout(limit, workload.run(&mut ctx)))
        .catch_unwind()
        .await;

    let error = match outcome {
        Ok(Ok(Ok(()))) => None,
        Ok(Ok(Err(source))) => Some(source.to_string()),
        Ok(Err(_)) => Some(format!("run timed out after {limit:?}")),
        Err(panic) => Some(format!("workload panicked: {}", panic_message(panic))),
    };
    let elapsed = started.elapsed();

    match &error {
        None => debug!(workload = %name, index, elapsed_ms = elapsed.as_millis(), "run succeeded"),
        Some(error) => warn!(workload = %name, index, %error, "run failed"),
    }

    RunRecord {
        workload: name,
        index,
        elapsed,
        steps: ctx.into_steps(),
        error,
    }
}

/// Waits for aborted tasks so no run outlives the scenario.
async fn drain(in_flight: &mut JoinSet<RunRecord>) {
    while in_flight.join_next().await.is_some() {}
}

/// Attempts to turn a panic payload into a readable string for diagnostics.
fn panic_message(panic: Box<dyn Any + Send>) -> String {
    panic.downcast::<String>().map_or_else(
        |panic| {
            panic.downcast::<&'static str>().map_or_else(
                |_| "unknown panic".to_owned(),
                |message| (*message).to_owned(),
            )
        },
        |message| *message,
    )
}
