use std::process;

use anyhow::{Context as _, Result, ensure};
use pat_config::{
    RestConfig,
    constants::{DEFAULT_CONCURRENCY, DEFAULT_ITERATIONS},
    timeouts,
};
use pat_core::{
    HttpTransport,
    scenario::{RunReport, Runner, ScenarioBuilder},
};
use pat_demos::{ScenarioBuilderExt as _, init_tracing, workload_steps};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    init_tracing();

    match run_rest_case().await {
        Ok(report) if report.all_succeeded() => info!("rest runner demo complete"),
        Ok(report) => {
            warn!(
                failed = report.failures(),
                total = report.records().len(),
                "rest runner demo finished with failed runs"
            );
            process::exit(1);
        }
        Err(err) => {
            warn!("rest runner demo failed: {err:#}");
            process::exit(1);
        }
    }
}

async fn run_rest_case() -> Result<RunReport> {
    let config = RestConfig::from_env().context("reading rest configuration")?;
    let steps = workload_steps().context("parsing PAT_WORKLOAD")?;
    let iterations = pat_env::iterations().unwrap_or(DEFAULT_ITERATIONS);
    let concurrency = pat_env::concurrency().unwrap_or(DEFAULT_CONCURRENCY);
    ensure!(iterations > 0, "PAT_ITERATIONS must be non-zero");
    ensure!(concurrency > 0, "PAT_CONCURRENCY must be non-zero");

    info!(
        api = %config.target,
        space = %config.space,
        iterations,
        concurrency,
        "starting rest runner demo"
    );

    let transport = HttpTransport::with_timeout(timeouts::http_timeout())
        .context("building http client")?;

    let scenario = ScenarioBuilder::new()
        .iterations(iterations)
        .concurrency(concurrency)
        .rest_with(transport, config, |rest| rest.steps(steps))
        .context("attaching rest workload")?
        .build()
        .context("building scenario")?;

    let report = Runner::run(&scenario)
        .await
        .context("running rest scenario failed")?;
    report.log_summary();

    Ok(report)
}
