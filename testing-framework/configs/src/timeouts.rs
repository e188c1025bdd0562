use std::time::Duration;

use pat_env as tf_env;

use crate::{
    adjust_timeout,
    constants::{DEFAULT_HTTP_TIMEOUT, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT},
};

fn env_duration(value: Option<u64>, into: fn(u64) -> Duration, default: Duration) -> Duration {
    value.map(into).unwrap_or(default)
}

/// Delay between instance polls, `PAT_POLL_INTERVAL_MS`.
pub fn poll_interval() -> Duration {
    env_duration(
        tf_env::poll_interval_ms(),
        Duration::from_millis,
        DEFAULT_POLL_INTERVAL,
    )
}

/// Polling budget, `PAT_POLL_TIMEOUT_SECS`, doubled on slow CI.
pub fn poll_timeout() -> Duration {
    adjust_timeout(env_duration(
        tf_env::poll_timeout_secs(),
        Duration::from_secs,
        DEFAULT_POLL_TIMEOUT,
    ))
}

pub fn http_timeout() -> Duration {
    env_duration(
        tf_env::http_timeout_secs(),
        Duration::from_secs,
        DEFAULT_HTTP_TIMEOUT,
    )
}
