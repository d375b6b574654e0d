use async_trait::async_trait;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER},
    StatusCode,
};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::{config::Credential, error::TransportError, transport::DiscordTransport};

/// reqwest-backed transport for the Discord REST API.
///
/// Cheap to clone: `reqwest::Client` is reference counted internally and the
/// credential is a read-only string shared by every request.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    credential: Credential,
}

impl HttpTransport {
    /// Creates a new transport.
    ///
    /// # Arguments
    /// - `client` - Shared HTTP client
    /// - `base_url` - API root, e.g. `https://discord.com/api/v10`
    /// - `credential` - Token sent verbatim in the `Authorization` header
    pub fn new(client: reqwest::Client, base_url: Url, credential: Credential) -> Self {
        Self {
            client,
            base_url,
            credential,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl DiscordTransport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .header(AUTHORIZATION, self.credential.expose())
            .header(CONTENT_TYPE, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let retry_header = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TransportError::RateLimited {
                retry_after: parse_retry_after(retry_header.as_deref(), &body),
            });
        }

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Longest delay honored from a rate-limit response.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(60 * 60);

/// Extracts the server-requested delay from a rate-limit response.
///
/// Discord sends seconds (possibly fractional) both in the `Retry-After`
/// header and in the JSON body's `retry_after` field. The header wins when
/// both are present. Delays are capped at [`MAX_RETRY_AFTER`].
pub fn parse_retry_after(header: Option<&str>, body: &str) -> Option<Duration> {
    let from_header = header.and_then(|h| h.trim().parse::<f64>().ok());
    let from_body = || {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("retry_after").and_then(Value::as_f64))
    };

    from_header
        .or_else(from_body)
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| {
            Duration::try_from_secs_f64(secs)
                .unwrap_or(MAX_RETRY_AFTER)
                .min(MAX_RETRY_AFTER)
        })
}
