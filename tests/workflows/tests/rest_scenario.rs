use std::sync::Arc;

use pat_core::{
    ScriptedTransport,
    scenario::{Runner, ScenarioBuilder, ScenarioError},
};
use pat_workflows::RestWorkload;
use tests_workflows::{
    APPS_URL, BITS_URL, RestStep, ScenarioBuilderExt as _, TOKEN_URL, pushable_platform,
    test_config, test_package,
};

const ITERATIONS: usize = 6;
const CONCURRENCY: usize = 3;

#[tokio::test]
async fn every_run_targets_logs_in_and_pushes() {
    let transport = pushable_platform("dev");

    let scenario = ScenarioBuilder::new()
        .iterations(ITERATIONS)
        .concurrency(CONCURRENCY)
        .rest_with(Arc::clone(&transport), test_config(), |rest| {
            rest.package(test_package())
        })
        .expect("rest workload attaches")
        .build()
        .expect("valid scenario");

    let report = Runner::run(&scenario).await.expect("scenario runs");

    assert!(report.all_succeeded(), "{:?}", report.records());
    assert_eq!(report.records().len(), ITERATIONS);
    assert_eq!(transport.count("POST", TOKEN_URL), ITERATIONS);
    assert_eq!(transport.count("POST", APPS_URL), ITERATIONS);
    assert_eq!(transport.count("PUT(multipart)", BITS_URL), ITERATIONS);

    let summaries = report.step_summaries();
    let names: Vec<_> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["rest:target", "rest:login", "rest:push"]);
    assert!(summaries.iter().all(|s| s.count == ITERATIONS && s.failures == 0));
}

#[tokio::test]
async fn failed_pushes_are_recorded_per_run() {
    let transport = pushable_platform("dev");
    transport.clear(BITS_URL);

    let scenario = ScenarioBuilder::new()
        .iterations(2)
        .with_workload(RestWorkload::new(
            Arc::clone(&transport),
            test_config(),
            test_package(),
            RestStep::ALL.to_vec(),
        ))
        .build()
        .expect("valid scenario");

    let report = Runner::run(&scenario).await.expect("scenario runs");

    assert_eq!(report.failures(), 2);
    for record in report.records() {
        let error = record.error.as_deref().unwrap_or_default();
        assert!(error.contains(BITS_URL), "{error}");
        assert_eq!(record.steps.len(), 3);
        assert!(!record.steps[2].succeeded);
    }
}

#[tokio::test]
async fn stop_on_failure_surfaces_the_first_failed_run() {
    let transport = Arc::new(ScriptedTransport::new());

    let scenario = ScenarioBuilder::new()
        .iterations(4)
        .stop_on_failure(true)
        .rest_with(Arc::clone(&transport), test_config(), |rest| {
            rest.package(test_package()).steps([RestStep::Target])
        })
        .expect("rest workload attaches")
        .build()
        .expect("valid scenario");

    let err = Runner::run(&scenario).await.expect_err("target is rejected");

    assert!(matches!(
        err,
        ScenarioError::RunFailed { ref workload, ref message, .. }
            if workload == "rest" && message.contains("400")
    ));
}

#[tokio::test]
async fn login_only_runs_skip_the_push_calls() {
    let transport = pushable_platform("dev");

    let scenario = ScenarioBuilder::new()
        .iterations(3)
        .rest_with(Arc::clone(&transport), test_config(), |rest| {
            rest.package(test_package())
                .steps(RestStep::parse_list("rest:target,rest:login").expect("known steps"))
        })
        .expect("rest workload attaches")
        .build()
        .expect("valid scenario");

    let report = Runner::run(&scenario).await.expect("scenario runs");

    assert!(report.all_succeeded());
    assert_eq!(transport.count("POST", TOKEN_URL), 3);
    assert_eq!(transport.count("POST", APPS_URL), 0);
}
