use std::time::Duration;

/// Space used when none is configured.
pub const DEFAULT_SPACE: &str = "dev";

/// OAuth client id presented to the login server over basic auth.
pub const LOGIN_CLIENT_ID: &str = "cf";

/// OAuth client secret paired with [`LOGIN_CLIENT_ID`].
pub const LOGIN_CLIENT_SECRET: &str = "";

/// Upper bound on `GET {app}/instances` calls per push.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 60;

/// Delay between two instance polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Wall-clock budget for the whole polling phase of a push.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-request timeout applied by the HTTP transport.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Workload runs executed when nothing else is configured.
pub const DEFAULT_ITERATIONS: usize = 1;

/// Workload runs allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 1;
