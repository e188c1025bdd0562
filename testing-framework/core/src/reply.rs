use crate::error::WorkflowError;

/// Outcome of one transport call as seen by the workflow.
///
/// `status_code` is `0` when no response was received at all; the
/// transport then puts its error text into `status_message`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub status_code: u16,
    pub status_message: String,
    pub location: String,
}

impl Reply {
    pub const NO_RESPONSE: u16 = 0;

    #[must_use]
    pub fn new(
        status_code: u16,
        status_message: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            status_message: status_message.into(),
            location: location.into(),
        }
    }

    #[must_use]
    pub fn no_response(error: impl Into<String>) -> Self {
        Self::new(Self::NO_RESPONSE, error, "")
    }

    #[must_use]
    pub const fn has_response(&self) -> bool {
        self.status_code != Self::NO_RESPONSE
    }

    /// Every 2xx counts as success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }

    /// Maps an unsuccessful reply onto the error taxonomy.
    #[must_use]
    pub fn to_error(&self, url: &str) -> WorkflowError {
        if self.has_response() {
            WorkflowError::Rejected {
                url: url.to_owned(),
                status: self.status_code,
                message: self.status_message.clone(),
            }
        } else {
            WorkflowError::Transport {
                url: url.to_owned(),
                message: self.status_message.clone(),
            }
        }
    }
}

/// Runs `then` only when `reply` is successful, otherwise returns the
/// failure derived from the reply without touching `then`.
pub fn check_successful_reply<T, F>(url: &str, reply: &Reply, then: F) -> Result<T, WorkflowError>
where
    F: FnOnce(&Reply) -> Result<T, WorkflowError>,
{
    if reply.is_success() {
        then(reply)
    } else {
        tracing::debug!(
            url,
            status = reply.status_code,
            message = %reply.status_message,
            "request failed"
        );
        Err(reply.to_error(url))
    }
}
