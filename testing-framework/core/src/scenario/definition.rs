use std::{num::NonZeroUsize, sync::Arc, time::Duration};

use pat_config::constants::{DEFAULT_CONCURRENCY, DEFAULT_ITERATIONS};
use thiserror::Error;
use tracing::info;

use super::workload::Workload;

const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioBuildError {
    #[error("scenario needs at least one workload")]
    NoWorkloads,
    #[error("{field} must be non-zero")]
    ZeroValue { field: &'static str },
}

/// Immutable scenario definition consumed by the [`Runner`](super::Runner).
pub struct Scenario {
    workloads: Vec<Arc<dyn Workload>>,
    iterations: NonZeroUsize,
    concurrency: NonZeroUsize,
    run_timeout: Duration,
    stop_on_failure: bool,
}

impl Scenario {
    #[must_use]
    pub fn workloads(&self) -> &[Arc<dyn Workload>] {
        &self.workloads
    }

    /// Runs executed per workload.
    #[must_use]
    pub const fn iterations(&self) -> NonZeroUsize {
        self.iterations
    }

    /// Runs allowed in flight at once, across all workloads.
    #[must_use]
    pub const fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
    }

    #[must_use]
    pub const fn run_timeout(&self) -> Duration {
        self.run_timeout
    }

    #[must_use]
    pub const fn stop_on_failure(&self) -> bool {
        self.stop_on_failure
    }

    /// Total number of runs the scenario schedules.
    #[must_use]
    pub fn total_runs(&self) -> usize {
        self.workloads.len() * self.iterations.get()
    }
}

/// Builder used by callers to describe the desired scenario.
pub struct Builder {
    workloads: Vec<Arc<dyn Workload>>,
    iterations: usize,
    concurrency: usize,
    run_timeout: Duration,
    stop_on_failure: bool,
}

pub type ScenarioBuilder = Builder;

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            workloads: Vec::new(),
            iterations: DEFAULT_ITERATIONS,
            concurrency: DEFAULT_CONCURRENCY,
            run_timeout: DEFAULT_RUN_TIMEOUT,
            stop_on_failure: false,
        }
    }

    #[must_use]
    /// Add a workload to the scenario.
    pub fn with_workload<W>(mut self, workload: W) -> Self
    where
        W: Workload + 'static,
    {
        self.workloads.push(Arc::new(workload));
        self
    }

    #[must_use]
    /// Add an already shared workload.
    pub fn with_shared_workload(mut self, workload: Arc<dyn Workload>) -> Self {
        self.workloads.push(workload);
        self
    }

    #[must_use]
    pub const fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub const fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    #[must_use]
    /// Upper bound on a single run; slower runs are aborted and recorded as
    /// failures.
    pub const fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    #[must_use]
    /// Abort the remaining runs as soon as one fails.
    pub const fn stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Validates the builder and produces the scenario.
    pub fn build(self) -> Result<Scenario, ScenarioBuildError> {
        if self.workloads.is_empty() {
            return Err(ScenarioBuildError::NoWorkloads);
        }
        let iterations = NonZeroUsize::new(self.iterations)
            .ok_or(ScenarioBuildError::ZeroValue { field: "iterations" })?;
        let concurrency = NonZeroUsize::new(self.concurrency)
            .ok_or(ScenarioBuildError::ZeroValue { field: "concurrency" })?;
        if self.run_timeout.is_zero() {
            return Err(ScenarioBuildError::ZeroValue {
                field: "run timeout",
            });
        }

        info!(
            workloads = self.workloads.len(),
            iterations = iterations.get(),
            concurrency = concurrency.get(),
            run_timeout_secs = self.run_timeout.as_secs(),
            "scenario built"
        );

        Ok(Scenario {
            workloads: self.workloads,
            iterations,
            concurrency,
            run_timeout: self.run_timeout,
            stop_on_failure: self.stop_on_failure,
        })
    }
}
