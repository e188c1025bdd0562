use std::{fmt, num::NonZeroU32, path::PathBuf, time::Duration};

use pat_env as tf_env;
use thiserror::Error;

use crate::{
    constants::{DEFAULT_POLL_ATTEMPTS, DEFAULT_SPACE},
    timeouts,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PAT_REST_TARGET must be set to the platform API url")]
    MissingTarget,
    #[error("username and password must be configured together (missing {missing})")]
    PartialCredentials { missing: &'static str },
}

/// Username/password pair used for the OAuth password grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bounds for the instance polling loop at the end of a push.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    pub max_attempts: NonZeroU32,
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollConfig {
    #[must_use]
    pub const fn new(max_attempts: NonZeroU32, interval: Duration, timeout: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            timeout,
        }
    }

    /// Reads `PAT_POLL_*`, falling back to the defaults for anything unset
    /// or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let max_attempts = tf_env::poll_attempts()
            .and_then(NonZeroU32::new)
            .unwrap_or(default_attempts());
        Self {
            max_attempts,
            interval: timeouts::poll_interval(),
            timeout: timeouts::poll_timeout(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_attempts(),
            interval: crate::constants::DEFAULT_POLL_INTERVAL,
            timeout: crate::constants::DEFAULT_POLL_TIMEOUT,
        }
    }
}

const fn default_attempts() -> NonZeroU32 {
    match NonZeroU32::new(DEFAULT_POLL_ATTEMPTS) {
        Some(value) => value,
        None => NonZeroU32::MIN,
    }
}

/// Everything the REST workload needs to know about the platform it drives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestConfig {
    pub target: String,
    pub space: String,
    pub credentials: Option<Credentials>,
    pub package_path: Option<PathBuf>,
    pub poll: PollConfig,
}

impl RestConfig {
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            space: DEFAULT_SPACE.to_owned(),
            credentials: None,
            package_path: None,
            poll: PollConfig::default(),
        }
    }

    #[must_use]
    pub fn with_space(mut self, space: impl Into<String>) -> Self {
        self.space = space.into();
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn with_package_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.package_path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Builds the config from `PAT_REST_*`, `PAT_APP_PACKAGE` and
    /// `PAT_POLL_*`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let target = tf_env::rest_target().ok_or(ConfigError::MissingTarget)?;
        let credentials =
            credentials_from_parts(tf_env::rest_username(), tf_env::rest_password())?;

        Ok(Self {
            target,
            space: tf_env::rest_space().unwrap_or_else(|| DEFAULT_SPACE.to_owned()),
            credentials,
            package_path: tf_env::app_package_path(),
            poll: PollConfig::from_env(),
        })
    }
}

fn credentials_from_parts(
    username: Option<String>,
    password: Option<String>,
) -> Result<Option<Credentials>, ConfigError> {
    match (username, password) {
        (Some(username), Some(password)) => Ok(Some(Credentials { username, password })),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::PartialCredentials { missing: "password" }),
        (None, Some(_)) => Err(ConfigError::PartialCredentials { missing: "username" }),
    }
}
