use std::time::Duration;

use tracing::info;

use crate::scenario::StepTiming;

/// Outcome of one workload run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunRecord {
    pub workload: String,
    pub index: usize,
    pub elapsed: Duration,
    pub steps: Vec<StepTiming>,
    pub error: Option<String>,
}

impl RunRecord {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated timings of one step name across all runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepSummary {
    pub name: String,
    pub count: usize,
    pub failures: usize,
    pub total: Duration,
    pub max: Duration,
}

impl StepSummary {
    #[must_use]
    pub fn mean(&self) -> Duration {
        u32::try_from(self.count)
            .ok()
            .filter(|count| *count > 0)
            .map_or(Duration::ZERO, |count| self.total / count)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunReport {
    records: Vec<RunRecord>,
    elapsed: Duration,
}

impl RunReport {
    #[must_use]
    pub const fn new(records: Vec<RunRecord>, elapsed: Duration) -> Self {
        Self { records, elapsed }
    }

    #[must_use]
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Wall-clock time of the whole scenario.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn successes(&self) -> usize {
        self.records.iter().filter(|r| r.succeeded()).count()
    }

    #[must_use]
    pub fn failures(&self) -> usize {
        self.records.len() - self.successes()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.records.iter().all(RunRecord::succeeded)
    }

    /// Per-step aggregates, in order of first appearance.
    #[must_use]
    pub fn step_summaries(&self) -> Vec<StepSummary> {
        let mut summaries: Vec<StepSummary> = Vec::new();
        for step in self.records.iter().flat_map(|record| &record.steps) {
            let position = summaries.iter().position(|s| s.name == step.name);
            let summary = match position {
                Some(position) => &mut summaries[position],
                None => {
                    summaries.push(StepSummary {
                        name: step.name.clone(),
                        count: 0,
                        failures: 0,
                        total: Duration::ZERO,
                        max: Duration::ZERO,
                    });
                    let last = summaries.len() - 1;
                    &mut summaries[last]
                }
            };
            summary.count += 1;
            summary.total += step.elapsed;
            summary.max = summary.max.max(step.elapsed);
            if !step.succeeded {
                summary.failures += 1;
            }
        }
        summaries
    }

    /// Emits one log line per step plus one per failed run.
    pub fn log_summary(&self) {
        for summary in self.step_summaries() {
            info!(
                step = %summary.name,
                count = summary.count,
                failures = summary.failures,
                mean_ms = summary.mean().as_millis(),
                max_ms = summary.max.as_millis(),
                "step timings"
            );
        }
        for record in self.records.iter().filter(|r| !r.succeeded()) {
            info!(
                workload = %record.workload,
                index = record.index,
                error = record.error.as_deref().unwrap_or_default(),
                "failed run"
            );
        }
    }
}
