//! Scenario description and execution: workloads are run repeatedly, each
//! run isolated in its own task, and timings are collected into a report.

mod definition;
pub mod runtime;
mod workload;

pub use definition::{Builder, Scenario, ScenarioBuildError, ScenarioBuilder};
pub use runtime::{
    report::{RunRecord, RunReport, StepSummary},
    runner::{Runner, ScenarioError},
};
pub use workload::{RunContext, StepTiming, Workload};

/// Type-erased error used at workload boundaries.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
