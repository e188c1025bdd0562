use pat_workflows::{RestStep, StepParseError};

/// Steps named by `PAT_WORKLOAD`, or the full target/login/push flow.
pub fn workload_steps() -> Result<Vec<RestStep>, StepParseError> {
    pat_env::workload().map_or_else(
        || Ok(RestStep::ALL.to_vec()),
        |raw| RestStep::parse_list(&raw),
    )
}
