//! In-memory transport for tests.
//!
//! Serves scripted replies per path and emulates Discord's message history
//! endpoint (`limit`/`before` semantics, newest-first pages) for channels
//! registered with a history. Every request is recorded for later assertions.

use async_trait::async_trait;
use serde_json::Value;
use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};
use tokio_util::sync::CancellationToken;

use crate::{error::TransportError, transport::DiscordTransport};

/// Scripted reply for a path.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful response with this JSON body
    Json(Value),
    /// 429 with an optional retry delay
    RateLimited(Option<Duration>),
    /// Non-success status code
    Status(u16),
}

impl MockReply {
    fn into_result(self) -> Result<Value, TransportError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::RateLimited(retry_after) => Err(TransportError::RateLimited { retry_after }),
            Self::Status(status) => Err(TransportError::Status {
                status,
                body: String::new(),
            }),
        }
    }
}

/// A request as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `before` cursor, if one was sent.
    pub fn before(&self) -> Option<u64> {
        self.param("before").and_then(|v| v.parse().ok())
    }

    pub fn limit(&self) -> Option<usize> {
        self.param("limit").and_then(|v| v.parse().ok())
    }
}

#[derive(Default)]
pub struct MockTransport {
    /// Scripted replies consumed in order; the last one keeps being served.
    replies: Mutex<HashMap<String, VecDeque<MockReply>>>,
    /// Channel histories, newest first.
    histories: HashMap<u64, Vec<Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
    latency: Option<Duration>,
    /// Cancels the token once this many requests have been served.
    cancel_after: Mutex<Option<(usize, CancellationToken)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `value` for every request to `path`.
    pub fn with_json(self, path: impl Into<String>, value: Value) -> Self {
        self.with_reply(path, MockReply::Json(value))
    }

    /// Appends a reply to the script for `path`.
    pub fn with_reply(self, path: impl Into<String>, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(path.into())
            .or_default()
            .push_back(reply);
        self
    }

    /// Registers a message history for `channel_id`, served page by page.
    pub fn with_history(mut self, channel_id: u64, mut messages: Vec<Value>) -> Self {
        messages.sort_by_key(|m| std::cmp::Reverse(message_id(m).unwrap_or(0)));
        self.histories.insert(channel_id, messages);
        self
    }

    /// Delays every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Cancels `token` right after the `count`-th request is served.
    pub fn cancel_after(self, count: usize, token: CancellationToken) -> Self {
        *self.cancel_after.lock().unwrap() = Some((count, token));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests made against one channel's message endpoint, in order.
    pub fn message_requests(&self, channel_id: u64) -> Vec<RecordedRequest> {
        let path = format!("channels/{}/messages", channel_id);
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    fn scripted(&self, path: &str) -> Option<MockReply> {
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(path)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    fn history_page(&self, path: &str, request: &RecordedRequest) -> Option<Value> {
        let channel_id: u64 = path
            .strip_prefix("channels/")?
            .strip_suffix("/messages")?
            .parse()
            .ok()?;
        let history = self.histories.get(&channel_id)?;

        let limit = request.limit().unwrap_or(50);
        let page: Vec<Value> = history
            .iter()
            .filter(|m| match request.before() {
                Some(before) => message_id(m).is_some_and(|id| id < before),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect();

        Some(Value::Array(page))
    }
}

fn message_id(message: &Value) -> Option<u64> {
    message.get("id")?.as_str()?.parse().ok()
}

#[async_trait]
impl DiscordTransport for MockTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError> {
        let request = RecordedRequest {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        };
        let served = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let result = match self.scripted(path) {
            Some(reply) => reply.into_result(),
            None => match self.history_page(path, &request) {
                Some(page) => Ok(page),
                None => Err(TransportError::Status {
                    status: 404,
                    body: r#"{"message": "Unknown Channel", "code": 10003}"#.to_string(),
                }),
            },
        };

        if let Some((count, token)) = self.cancel_after.lock().unwrap().as_ref() {
            if served >= *count {
                token.cancel();
            }
        }

        result
    }
}
