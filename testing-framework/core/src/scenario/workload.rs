use std::{
    future::Future,
    time::{Duration, Instant},
};

use async_trait::async_trait;

use super::DynError;

/// Elapsed time of one named step inside a workload run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepTiming {
    pub name: String,
    pub elapsed: Duration,
    pub succeeded: bool,
}

/// Per-run state handed to [`Workload::run`].
#[derive(Debug, Default)]
pub struct RunContext {
    index: usize,
    steps: Vec<StepTiming>,
}

impl RunContext {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            steps: Vec::new(),
        }
    }

    /// Zero-based position of this run within its workload.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub(crate) fn into_steps(self) -> Vec<StepTiming> {
        self.steps
    }

    pub fn record_step(&mut self, name: impl Into<String>, elapsed: Duration, succeeded: bool) {
        self.steps.push(StepTiming {
            name: name.into(),
            elapsed,
            succeeded,
        });
    }

    /// Awaits `step`, recording how long it took and whether it succeeded.
    pub async fn time_step<T, E, F>(&mut self, name: &str, step: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let started = Instant::now();
        let outcome = step.await;
        self.record_step(name, started.elapsed(), outcome.is_ok());
        outcome
    }
}

#[async_trait]
/// One complete unit of simulated user activity, executed once per run.
pub trait Workload: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, ctx: &mut RunContext) -> Result<(), DynError>;
}
