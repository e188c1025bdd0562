//! JSON shapes exchanged with the platform's v2 API and login server.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInfo {
    #[serde(default)]
    pub authorization_endpoint: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceLookup {
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl SpaceLookup {
    #[must_use]
    pub fn with_guid(guid: impl Into<String>) -> Self {
        Self {
            resources: vec![Resource {
                metadata: Metadata { guid: guid.into() },
            }],
        }
    }

    #[must_use]
    pub fn first_guid(&self) -> Option<&str> {
        self.resources
            .first()
            .map(|resource| resource.metadata.guid.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub metadata: Metadata,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub guid: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateApp<'a> {
    pub name: &'a str,
    pub space_guid: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpdateAppState {
    pub state: &'static str,
}

impl UpdateAppState {
    pub const STARTED: Self = Self { state: "STARTED" };
}

/// Body of `GET /v2/apps/:guid/instances`, keyed by instance index.
pub type InstanceStates = BTreeMap<String, InstanceInfo>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceInfo {
    #[serde(default)]
    pub state: String,
}

/// Error body the v2 API sends with 4xx/5xx replies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformError {
    #[serde(default)]
    pub code: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub error_code: String,
}
