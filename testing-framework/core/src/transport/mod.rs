pub mod http;
pub mod scripted;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::reply::Reply;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which credentials the transport attaches to a request.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    None,
    /// `Authorization: bearer <token>`; an empty token sends no header.
    Bearer(String),
    /// HTTP basic auth with the fixed login client identity.
    LoginServer,
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer(token) if token.is_empty() => f.write_str("Bearer(<empty>)"),
            Self::Bearer(_) => f.write_str("Bearer(<token>)"),
            Self::LoginServer => f.write_str("LoginServer"),
        }
    }
}

/// One file part of a multipart upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub file: FilePart,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
    Multipart(MultipartBody),
}

impl RequestBody {
    /// Content type the body is sent with. Multipart boundaries are chosen
    /// by the transport, so only the media type is reported here.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some("application/json"),
            Self::Form(_) => Some("application/x-www-form-urlencoded"),
            Self::Multipart(_) => Some("multipart/form-data"),
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn form_value(&self, key: &str) -> Option<&str> {
        match self {
            Self::Form(pairs) => pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

/// A fully described request handed to a [`Transport`].
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub auth: AuthMode,
    pub body: RequestBody,
}

impl HttpRequest {
    #[must_use]
    pub fn get(url: impl Into<String>, auth: AuthMode) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            auth,
            body: RequestBody::Empty,
        }
    }

    #[must_use]
    pub fn post(url: impl Into<String>, auth: AuthMode, body: RequestBody) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            auth,
            body,
        }
    }

    #[must_use]
    pub fn put(url: impl Into<String>, auth: AuthMode, body: RequestBody) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            auth,
            body,
        }
    }

    /// Serializes `body` as the JSON payload. Serialization of the workflow's
    /// own payload types cannot fail; anything else is sent as `null`.
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(
        method: Method,
        url: impl Into<String>,
        token: &str,
        body: &T,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            auth: AuthMode::Bearer(token.to_owned()),
            body: RequestBody::Json(serde_json::to_value(body).unwrap_or(Value::Null)),
        }
    }

    /// Form POST to the login server using the fixed client identity.
    #[must_use]
    pub fn login_form(url: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self::post(url, AuthMode::LoginServer, RequestBody::Form(fields))
    }

    /// Short label naming the call shape, e.g. `PUT(multipart)` or
    /// `POST(uaa)`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match (&self.method, &self.body, &self.auth) {
            (Method::Put, RequestBody::Multipart(_), _) => "PUT(multipart)",
            (Method::Post, _, AuthMode::LoginServer) => "POST(uaa)",
            (method, _, _) => method.as_str(),
        }
    }
}

/// What came back from one request: the reply descriptor plus whatever JSON
/// the platform sent, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Exchange {
    pub reply: Reply,
    pub payload: Option<Value>,
}

impl Exchange {
    #[must_use]
    pub const fn new(reply: Reply, payload: Option<Value>) -> Self {
        Self { reply, payload }
    }

    #[must_use]
    pub fn no_response(error: impl Into<String>) -> Self {
        Self::new(Reply::no_response(error), None)
    }

    /// Best-effort decode of the payload into `T`.
    ///
    /// A missing payload or one that does not match `T` yields
    /// `T::default()`; decode errors never fail the exchange.
    #[must_use]
    pub fn decode<T: DeserializeOwned + Default>(&self) -> T {
        self.try_decode().unwrap_or_default()
    }

    /// Like [`Exchange::decode`] but reports whether decoding worked.
    #[must_use]
    pub fn try_decode<T: DeserializeOwned>(&self) -> Option<T> {
        let payload = self.payload.clone()?;
        match serde_json::from_value(payload) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::debug!(%error, "ignoring undecodable response payload");
                None
            }
        }
    }
}

/// Issues a single HTTP request and reports the outcome.
///
/// Implementations never return an error: a request that got no response is
/// reported as a [`Reply`] with status code `0`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: HttpRequest) -> Exchange;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request(&self, request: HttpRequest) -> Exchange {
        (**self).request(request).await
    }
}
