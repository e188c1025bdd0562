pub mod defaults;
pub mod env;

pub use defaults::init_tracing;
pub use env::workload_steps;
pub use pat_workflows::ScenarioBuilderExt;
