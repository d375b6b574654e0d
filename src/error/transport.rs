use std::time::Duration;
use thiserror::Error;

use crate::util::text::truncate_for_log;

/// Failure of a single request against the Discord REST API.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP client request error from reqwest (connection, TLS, timeout, body read).
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status code.
    #[error("Discord API responded with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Server answered 429 Too Many Requests.
    ///
    /// `retry_after` is taken from the `Retry-After` header or the JSON body's
    /// `retry_after` field when either is present.
    #[error("Rate limited by Discord API (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    /// Response body is not valid JSON.
    #[error("Failed to decode Discord API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A page or listing response that could not be used where a list was expected.
///
/// Anomalies are recovered locally as "no more data for this channel" and are
/// logged rather than escalated.
#[derive(Error, Debug)]
pub enum TransportAnomaly {
    /// The request itself failed.
    #[error(transparent)]
    Failed(#[from] TransportError),

    /// The request succeeded but the body is not a JSON list.
    #[error("Expected a JSON list, got {detail}")]
    Malformed {
        /// Short rendering of what was received instead
        detail: String,
    },
}

impl TransportAnomaly {
    /// Builds a `Malformed` anomaly from an unexpected JSON body.
    ///
    /// The body is truncated so that large error payloads or HTML pages don't
    /// flood the logs.
    pub fn malformed(body: &serde_json::Value) -> Self {
        Self::Malformed {
            detail: truncate_for_log(&body.to_string(), 200),
        }
    }
}
