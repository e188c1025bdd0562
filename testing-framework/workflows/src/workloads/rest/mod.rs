mod step;
mod workload;

pub use step::{RestStep, StepParseError};
pub use workload::Workload;
