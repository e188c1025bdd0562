use std::time::Duration;

use async_trait::async_trait;
use pat_config::constants::{LOGIN_CLIENT_ID, LOGIN_CLIENT_SECRET};
use reqwest::{
    Client, RequestBuilder, Response,
    header::{CONTENT_TYPE, LOCATION},
    multipart::{Form, Part},
};
use serde_json::Value;
use tracing::{debug, warn};

use super::{AuthMode, Exchange, HttpRequest, Method, MultipartBody, RequestBody, Transport};
use crate::reply::Reply;

/// [`Transport`] backed by a shared `reqwest` connection pool.
///
/// Cloning is cheap and every clone reuses the same pool, so one instance
/// can serve any number of concurrent workload runs.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a transport whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn build(&self, request: HttpRequest) -> reqwest::Result<RequestBuilder> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Put => self.client.put(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        let builder = match request.auth {
            AuthMode::None => builder,
            AuthMode::Bearer(token) if token.is_empty() => builder,
            AuthMode::Bearer(token) => builder.bearer_auth(token),
            AuthMode::LoginServer => builder.basic_auth(LOGIN_CLIENT_ID, Some(LOGIN_CLIENT_SECRET)),
        };

        Ok(match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart(body) => builder.multipart(multipart_form(body)?),
        })
    }
}

fn multipart_form(body: MultipartBody) -> reqwest::Result<Form> {
    let form = body
        .fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));
    let file = Part::bytes(body.file.bytes.to_vec())
        .file_name(body.file.file_name)
        .mime_str(&body.file.content_type)?;
    Ok(form.part(body.file.field, file))
}

async fn into_exchange(response: Response) -> Exchange {
    let status = response.status();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("json"));

    let payload = match response.bytes().await {
        Ok(bytes) if bytes.is_empty() => None,
        Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Some(value),
            Err(error) => {
                if is_json {
                    debug!(%error, "response body is not valid JSON");
                }
                None
            }
        },
        Err(error) => {
            debug!(%error, "failed to read response body");
            None
        }
    };

    Exchange::new(Reply::new(status.as_u16(), status.to_string(), location), payload)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: HttpRequest) -> Exchange {
        let label = request.label();
        let url = request.url.clone();
        debug!(call = label, %url, "sending request");

        let builder = match self.build(request) {
            Ok(builder) => builder,
            Err(error) => {
                warn!(call = label, %url, %error, "failed to build request");
                return Exchange::no_response(error.to_string());
            }
        };

        match builder.send().await {
            Ok(response) => {
                let exchange = into_exchange(response).await;
                debug!(
                    call = label,
                    %url,
                    status = exchange.reply.status_code,
                    "received response"
                );
                exchange
            }
            Err(error) => {
                warn!(call = label, %url, %error, "request failed without a response");
                Exchange::no_response(error.to_string())
            }
        }
    }
}
