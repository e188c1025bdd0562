pub mod builder;
pub mod rest;
pub mod workloads;

pub use builder::{BuilderInputError, RestFlowBuilder, ScenarioBuilderExt};
pub use rest::{AppPackage, PackageError, PushedApp, RestContext};
pub use workloads::rest::{RestStep, StepParseError, Workload as RestWorkload};
