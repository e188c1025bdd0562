use std::sync::Arc;

use pat_config::{Credentials, RestConfig};
use pat_core::{
    AuthMode, Exchange, HttpRequest, Method, RequestBody, Transport, WorkflowError,
    check_successful_reply,
};
use tracing::{debug, info};

use super::{
    naming::unique_app_name,
    package::AppPackage,
    payloads::{CreateApp, SpaceLookup, TargetInfo, TokenResponse, UpdateAppState},
    poll::wait_until_running,
};

/// App created by a successful [`RestContext::push`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushedApp {
    pub name: String,
    pub url: String,
    pub polls: u32,
}

/// State of one workload run against the platform API.
///
/// `target` discovers the login server, `login` obtains a token and resolves
/// the space, `push` creates, uploads and starts an app. Each instance
/// belongs to a single run; concurrent runs each build their own.
pub struct RestContext<T> {
    transport: T,
    config: Arc<RestConfig>,
    package: AppPackage,
    api_url: String,
    login_server_url: String,
    access_token: String,
    space_guid: String,
}

impl<T: Transport> RestContext<T> {
    #[must_use]
    pub fn new(transport: T, config: impl Into<Arc<RestConfig>>, package: AppPackage) -> Self {
        Self {
            transport,
            config: config.into(),
            package,
            api_url: String::new(),
            login_server_url: String::new(),
            access_token: String::new(),
            space_guid: String::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Empty until `target` succeeds.
    #[must_use]
    pub fn login_server_url(&self) -> &str {
        &self.login_server_url
    }

    /// Empty until `login` succeeds.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    #[must_use]
    pub fn space_guid(&self) -> &str {
        &self.space_guid
    }

    /// `GET {api}/v2/info` and remember the authorization endpoint.
    pub async fn target(&mut self, api_url: &str) -> Result<(), WorkflowError> {
        let api_url = api_url.trim_end_matches('/');
        let info: TargetInfo = self
            .call_successfully(
                HttpRequest::get(format!("{api_url}/v2/info"), AuthMode::None),
                |exchange| Ok(exchange.decode()),
            )
            .await?;

        info!(
            api = api_url,
            login_server = %info.authorization_endpoint,
            "targeted platform"
        );
        self.api_url = api_url.to_owned();
        self.login_server_url = info.authorization_endpoint;
        Ok(())
    }

    /// Obtains an access token from the login server, then resolves the
    /// configured space. Nothing is stored unless both steps succeed.
    pub async fn login(&mut self) -> Result<(), WorkflowError> {
        if self.login_server_url.is_empty() {
            return Err(WorkflowError::NotTargeted);
        }

        let token_url = format!("{}/oauth/token", self.login_server_url);
        let request = match &self.config.credentials {
            Some(credentials) => HttpRequest::login_form(token_url, password_grant(credentials)),
            // Anonymous mode never presents a credential, even on re-login.
            None => HttpRequest::post(token_url, AuthMode::Bearer(String::new()), RequestBody::Empty),
        };
        let token: TokenResponse = self
            .call_successfully(request, |exchange| Ok(exchange.decode()))
            .await?;

        let space = self.config.space.clone();
        let space_guid = self
            .call_successfully(
                HttpRequest::get(
                    format!("{}/v2/spaces?q=name:{space}", self.api_url),
                    AuthMode::Bearer(token.access_token.clone()),
                ),
                |exchange| {
                    exchange
                        .decode::<SpaceLookup>()
                        .first_guid()
                        .map(str::to_owned)
                        .ok_or(WorkflowError::SpaceNotFound { space: space.clone() })
                },
            )
            .await?;

        info!(%space, %space_guid, "logged in");
        self.access_token = token.access_token;
        self.space_guid = space_guid;
        Ok(())
    }

    /// Creates an app in the resolved space, uploads the package, starts it
    /// and waits for a running instance.
    ///
    /// Steps already performed are not rolled back when a later one fails.
    pub async fn push(&self) -> Result<PushedApp, WorkflowError> {
        if self.access_token.is_empty() {
            return Err(WorkflowError::NotLoggedIn);
        }

        let name = unique_app_name();
        let apps_url = format!("{}/v2/apps", self.api_url);
        let location = self
            .call_successfully(
                HttpRequest::json(
                    Method::Post,
                    apps_url.clone(),
                    &self.access_token,
                    &CreateApp {
                        name: &name,
                        space_guid: &self.space_guid,
                    },
                ),
                |exchange| {
                    let reply = &exchange.reply;
                    if reply.location.is_empty() {
                        Err(WorkflowError::MissingLocation {
                            url: apps_url.clone(),
                            status: reply.status_code,
                        })
                    } else {
                        Ok(reply.location.clone())
                    }
                },
            )
            .await?;
        let app_url = self.resolve(&location);
        debug!(%name, %app_url, "app created");

        self.call_successfully(
            HttpRequest::put(
                format!("{app_url}/bits"),
                self.bearer(),
                RequestBody::Multipart(self.package.multipart()),
            ),
            |_| Ok(()),
        )
        .await?;
        debug!(%name, bytes = self.package.bytes().len(), "bits uploaded");

        self.call_successfully(
            HttpRequest::json(
                Method::Put,
                app_url.clone(),
                &self.access_token,
                &UpdateAppState::STARTED,
            ),
            |_| Ok(()),
        )
        .await?;
        debug!(%name, "start requested");

        let polls =
            wait_until_running(&self.transport, &app_url, &self.access_token, &self.config.poll)
                .await?;

        info!(%name, %app_url, polls, "app pushed");
        Ok(PushedApp {
            name,
            url: app_url,
            polls,
        })
    }

    fn bearer(&self) -> AuthMode {
        AuthMode::Bearer(self.access_token.clone())
    }

    /// Locations are usually API-relative paths; absolute URLs pass through.
    fn resolve(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_owned()
        } else if location.starts_with('/') {
            format!("{}{location}", self.api_url)
        } else {
            format!("{}/{location}", self.api_url)
        }
    }

    async fn call_successfully<R, F>(&self, request: HttpRequest, then: F) -> Result<R, WorkflowError>
    where
        F: FnOnce(&Exchange) -> Result<R, WorkflowError>,
    {
        let url = request.url.clone();
        let exchange = self.transport.request(request).await;
        check_successful_reply(&url, &exchange.reply, |_| then(&exchange))
    }
}

fn password_grant(credentials: &Credentials) -> Vec<(String, String)> {
    vec![
        ("grant_type".to_owned(), "password".to_owned()),
        ("username".to_owned(), credentials.username.clone()),
        ("password".to_owned(), credentials.password.clone()),
        ("scope".to_owned(), String::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_grant_fields_are_verbatim() {
        let fields = password_grant(&Credentials::new("foo", "bar"));
        let body = RequestBody::Form(fields);
        assert_eq!(body.form_value("grant_type"), Some("password"));
        assert_eq!(body.form_value("username"), Some("foo"));
        assert_eq!(body.form_value("password"), Some("bar"));
        assert_eq!(body.form_value("scope"), Some(""));
    }

    #[test]
    fn locations_resolve_against_the_api() {
        let mut ctx = RestContext::new(
            pat_core::ScriptedTransport::new(),
            RestConfig::new("API"),
            AppPackage::from_bytes("a.zip", b"zip".to_vec()),
        );
        ctx.api_url = "API".into();

        assert_eq!(ctx.resolve("/v2/apps/1"), "API/v2/apps/1");
        assert_eq!(ctx.resolve("v2/apps/1"), "API/v2/apps/1");
        assert_eq!(
            ctx.resolve("https://other/v2/apps/1"),
            "https://other/v2/apps/1"
        );
    }
}
