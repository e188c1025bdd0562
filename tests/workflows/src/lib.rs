//! Shared fixtures for the workflow integration tests: a scripted platform
//! that answers the target, login and push calls of one app.

use std::{num::NonZeroU32, sync::Arc, time::Duration};

use pat_config::{PollConfig, RestConfig};
use pat_core::ScriptedTransport;
use pat_workflows::AppPackage;
use serde_json::json;

pub use pat_workflows::{RestStep, ScenarioBuilderExt};

pub const API: &str = "APISERVER";
pub const LOGIN_SERVER: &str = "THELOGINSERVER/PATH";
pub const TOKEN_URL: &str = "THELOGINSERVER/PATH/oauth/token";
pub const APPS_URL: &str = "APISERVER/v2/apps";
pub const APP_LOCATION: &str = "/THE-APP-URI";
pub const APP_URL: &str = "APISERVER/THE-APP-URI";
pub const BITS_URL: &str = "APISERVER/THE-APP-URI/bits";
pub const INSTANCES_URL: &str = "APISERVER/THE-APP-URI/instances";
pub const SPACE_GUID: &str = "blah blah";
pub const TOKEN: &str = "blah blah";

#[must_use]
pub fn space_url(space: &str) -> String {
    format!("{API}/v2/spaces?q=name:{space}")
}

/// Answers `/v2/info` only; login and push calls get `400`.
#[must_use]
pub fn targetable_platform() -> Arc<ScriptedTransport> {
    let transport = Arc::new(ScriptedTransport::new());
    transport.reply_json(
        format!("{API}/v2/info"),
        &json!({"authorization_endpoint": LOGIN_SERVER}),
    );
    transport
}

/// Answers every call of a full target/login/push run in `space`, with the
/// app running on the first instances poll.
#[must_use]
pub fn pushable_platform(space: &str) -> Arc<ScriptedTransport> {
    let transport = targetable_platform();
    transport
        .reply_json(TOKEN_URL, &json!({"access_token": TOKEN}))
        .reply_json(
            space_url(space),
            &json!({"resources": [{"metadata": {"guid": SPACE_GUID}}]}),
        )
        .reply_with_location(APPS_URL, APP_LOCATION)
        .reply_json(APP_URL, &"")
        .reply_json(BITS_URL, &"")
        .reply_json(INSTANCES_URL, &json!({"0": {"state": "RUNNING"}}));
    transport
}

#[must_use]
pub fn test_package() -> AppPackage {
    AppPackage::from_bytes("app.zip", b"PK fake zip".to_vec())
}

/// Config against [`API`] with a small poll budget.
#[must_use]
pub fn test_config() -> RestConfig {
    RestConfig::new(API).with_poll(PollConfig::new(
        NonZeroU32::MIN.saturating_add(4),
        Duration::from_millis(10),
        Duration::from_secs(5),
    ))
}
