use std::{env, path::PathBuf};

#[must_use]
pub fn slow_test_env() -> bool {
    env::var("SLOW_TEST_ENV").is_ok_and(|s| s == "true")
}

#[must_use]
pub fn rest_target() -> Option<String> {
    non_empty("PAT_REST_TARGET")
}

#[must_use]
pub fn rest_space() -> Option<String> {
    non_empty("PAT_REST_SPACE")
}

#[must_use]
pub fn rest_username() -> Option<String> {
    non_empty("PAT_REST_USERNAME")
}

#[must_use]
pub fn rest_password() -> Option<String> {
    non_empty("PAT_REST_PASSWORD")
}

#[must_use]
pub fn app_package_path() -> Option<PathBuf> {
    non_empty("PAT_APP_PACKAGE").map(PathBuf::from)
}

#[must_use]
pub fn poll_attempts() -> Option<u32> {
    parsed("PAT_POLL_ATTEMPTS")
}

#[must_use]
pub fn poll_interval_ms() -> Option<u64> {
    parsed("PAT_POLL_INTERVAL_MS")
}

#[must_use]
pub fn poll_timeout_secs() -> Option<u64> {
    parsed("PAT_POLL_TIMEOUT_SECS")
}

#[must_use]
pub fn http_timeout_secs() -> Option<u64> {
    parsed("PAT_HTTP_TIMEOUT_SECS")
}

#[must_use]
pub fn iterations() -> Option<usize> {
    parsed("PAT_ITERATIONS")
}

#[must_use]
pub fn concurrency() -> Option<usize> {
    parsed("PAT_CONCURRENCY")
}

#[must_use]
pub fn workload() -> Option<String> {
    non_empty("PAT_WORKLOAD")
}

#[must_use]
pub fn rust_log() -> Option<String> {
    env::var("RUST_LOG").ok()
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
