use std::time::Duration;

use thiserror::Error;

/// Failure of a single workflow operation (target, login or push).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("not targeted: call target before login")]
    NotTargeted,
    #[error("not logged in: call login before push")]
    NotLoggedIn,
    #[error("no response from {url}: {message}")]
    Transport { url: String, message: String },
    #[error("{url} rejected the request with {status} ({message})")]
    Rejected {
        url: String,
        status: u16,
        message: String,
    },
    #[error("space '{space}' not found")]
    SpaceNotFound { space: String },
    #[error("{url} answered {status} without a Location header")]
    MissingLocation { url: String, status: u16 },
    #[error("app at {app_url} failed to stage: {description}")]
    StagingFailed { app_url: String, description: String },
    #[error("app at {app_url} was still not staged after {attempts} polls")]
    NotStaged { app_url: String, attempts: u32 },
    #[error("every instance of {app_url} ended in a failed state ({states})")]
    InstancesFailed { app_url: String, states: String },
    #[error("app at {app_url} did not report a running instance after {attempts} polls in {elapsed:?}")]
    PollBudgetExhausted {
        app_url: String,
        attempts: u32,
        elapsed: Duration,
    },
}

impl WorkflowError {
    /// True for the errors raised before any request was issued.
    #[must_use]
    pub const fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotTargeted | Self::NotLoggedIn)
    }

    /// True when the platform itself reported a failure of the pushed app.
    #[must_use]
    pub const fn is_app_failure(&self) -> bool {
        matches!(
            self,
            Self::StagingFailed { .. } | Self::NotStaged { .. } | Self::InstancesFailed { .. }
        )
    }
}
