use pat_config::PollConfig;
use pat_core::{AuthMode, Exchange, HttpRequest, Transport, WorkflowError};
use tokio::time::{Instant, sleep};
use tracing::debug;

use super::payloads::{InstanceStates, PlatformError};

const RUNNING: &str = "RUNNING";
const FAILED_STATES: [&str; 2] = ["CRASHED", "FLAPPING"];
const NOT_STAGED: &str = "CF-NotStaged";
const STAGING_ERROR: &str = "CF-StagingError";

/// What a single instances poll told us.
#[derive(Debug, PartialEq, Eq)]
enum PollStatus {
    Running,
    Pending { not_staged: bool },
    Failed(WorkflowError),
}

/// Polls `{app_url}/instances` until an instance runs, the platform reports
/// a terminal failure, or the attempt/time budget runs out.
///
/// Returns the number of polls issued.
pub(crate) async fn wait_until_running<T>(
    transport: &T,
    app_url: &str,
    token: &str,
    poll: &PollConfig,
) -> Result<u32, WorkflowError>
where
    T: Transport + ?Sized,
{
    let url = format!("{app_url}/instances");
    let started = Instant::now();
    let deadline = started + poll.timeout;
    let max_attempts = poll.max_attempts.get();
    let mut attempts = 0;
    let not_staged;

    loop {
        attempts += 1;
        let exchange = transport
            .request(HttpRequest::get(&url, AuthMode::Bearer(token.to_owned())))
            .await;

        match classify(&exchange, &url, app_url) {
            PollStatus::Running => {
                debug!(%app_url, attempts, "app is running");
                return Ok(attempts);
            }
            PollStatus::Failed(error) => return Err(error),
            PollStatus::Pending { not_staged: pending } => {
                debug!(%app_url, attempts, not_staged = pending, "app not running yet");
                if attempts >= max_attempts || Instant::now() + poll.interval > deadline {
                    not_staged = pending;
                    break;
                }
            }
        }
        sleep(poll.interval).await;
    }

    if not_staged {
        Err(WorkflowError::NotStaged {
            app_url: app_url.to_owned(),
            attempts,
        })
    } else {
        Err(WorkflowError::PollBudgetExhausted {
            app_url: app_url.to_owned(),
            attempts,
            elapsed: started.elapsed(),
        })
    }
}

fn classify(exchange: &Exchange, url: &str, app_url: &str) -> PollStatus {
    let reply = &exchange.reply;
    if reply.is_success() {
        // Anything that is not an instance map counts as running.
        let Some(instances) = exchange.try_decode::<InstanceStates>() else {
            return PollStatus::Running;
        };
        return classify_instances(&instances, app_url);
    }

    if !reply.has_response() {
        return PollStatus::Failed(reply.to_error(url));
    }

    let error: PlatformError = exchange.decode();
    match error.error_code.as_str() {
        NOT_STAGED => PollStatus::Pending { not_staged: true },
        STAGING_ERROR => PollStatus::Failed(WorkflowError::StagingFailed {
            app_url: app_url.to_owned(),
            description: error.description,
        }),
        _ => PollStatus::Failed(reply.to_error(url)),
    }
}

fn classify_instances(instances: &InstanceStates, app_url: &str) -> PollStatus {
    if instances.values().any(|info| info.state == RUNNING) {
        return PollStatus::Running;
    }

    let all_failed = !instances.is_empty()
        && instances
            .values()
            .all(|info| FAILED_STATES.contains(&info.state.as_str()));
    if all_failed {
        let states = instances
            .iter()
            .map(|(index, info)| format!("{index}:{}", info.state))
            .collect::<Vec<_>>()
            .join(",");
        return PollStatus::Failed(WorkflowError::InstancesFailed {
            app_url: app_url.to_owned(),
            states,
        });
    }

    PollStatus::Pending { not_staged: false }
}
