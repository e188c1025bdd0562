use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::{AuthMode, Exchange, HttpRequest, RequestBody, Transport};
use crate::reply::Reply;

const UNSCRIPTED_STATUS: u16 = 400;
const UNSCRIPTED_MESSAGE: &str = "Some error";

/// A canned answer for one URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedReply {
    pub reply: Reply,
    pub payload: Option<Value>,
}

impl ScriptedReply {
    /// `200 Success` with a JSON payload.
    #[must_use]
    pub fn ok<T: Serialize>(payload: &T) -> Self {
        Self {
            reply: Reply::new(200, "Success", ""),
            payload: serde_json::to_value(payload).ok(),
        }
    }

    /// `201 Created` pointing at `location`.
    #[must_use]
    pub fn created(location: impl Into<String>) -> Self {
        Self {
            reply: Reply::new(201, "Created", location),
            payload: None,
        }
    }

    /// Arbitrary status with an optional payload.
    #[must_use]
    pub fn status(code: u16, message: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            reply: Reply::new(code, message, ""),
            payload,
        }
    }

    /// No response at all, as after a refused connection.
    #[must_use]
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            reply: Reply::no_response(message),
            payload: None,
        }
    }

    fn to_exchange(&self) -> Exchange {
        Exchange::new(self.reply.clone(), self.payload.clone())
    }
}

/// A request observed by the [`ScriptedTransport`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub label: &'static str,
    pub url: String,
    pub auth: AuthMode,
    pub body: RequestBody,
}

#[derive(Default)]
struct Script {
    replies: HashMap<String, VecDeque<ScriptedReply>>,
    calls: Vec<RecordedCall>,
}

/// In-memory [`Transport`] that answers from a script and records every call.
///
/// Each URL maps to a queue of replies; replies are consumed in order and
/// the last one repeats. A URL with no script answers `400 Some error`.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answers `url` with `200` and `payload`.
    pub fn reply_json<T: Serialize>(&self, url: impl Into<String>, payload: &T) -> &Self {
        self.reply_sequence(url, [ScriptedReply::ok(payload)])
    }

    /// Answers `url` with `201` and the given `Location`.
    pub fn reply_with_location(&self, url: impl Into<String>, location: impl Into<String>) -> &Self {
        self.reply_sequence(url, [ScriptedReply::created(location)])
    }

    pub fn reply(&self, url: impl Into<String>, reply: ScriptedReply) -> &Self {
        self.reply_sequence(url, [reply])
    }

    /// Replaces the script for `url` with `replies`, answered in order.
    pub fn reply_sequence(
        &self,
        url: impl Into<String>,
        replies: impl IntoIterator<Item = ScriptedReply>,
    ) -> &Self {
        self.lock()
            .replies
            .insert(url.into(), replies.into_iter().collect());
        self
    }

    /// Drops any script for `url`, so it answers `400` again.
    pub fn clear(&self, url: &str) -> &Self {
        self.lock().replies.remove(url);
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// The most recent call with the given label and URL.
    #[must_use]
    pub fn call(&self, label: &str, url: &str) -> Option<RecordedCall> {
        self.lock()
            .calls
            .iter()
            .rev()
            .find(|call| call.label == label && call.url == url)
            .cloned()
    }

    #[must_use]
    pub fn count(&self, label: &str, url: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.label == label && call.url == url)
            .count()
    }

    /// `(label, url)` of every call, in order.
    #[must_use]
    pub fn call_log(&self) -> Vec<(&'static str, String)> {
        self.lock()
            .calls
            .iter()
            .map(|call| (call.label, call.url.clone()))
            .collect()
    }

    pub fn reset_calls(&self) {
        self.lock().calls.clear();
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, request: HttpRequest) -> Exchange {
        let mut script = self.lock();
        let label = request.label();
        let exchange = match script.replies.get_mut(&request.url) {
            Some(queue) if queue.len() > 1 => queue
                .pop_front()
                .map(|reply| reply.to_exchange())
                .unwrap_or_default(),
            Some(queue) => queue
                .front()
                .map(ScriptedReply::to_exchange)
                .unwrap_or_else(unscripted),
            None => unscripted(),
        };

        script.calls.push(RecordedCall {
            label,
            url: request.url,
            auth: request.auth,
            body: request.body,
        });
        exchange
    }
}

fn unscripted() -> Exchange {
    Exchange::new(Reply::new(UNSCRIPTED_STATUS, UNSCRIPTED_MESSAGE, ""), None)
}
