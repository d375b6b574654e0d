//! Transport layer: authenticated GET requests against the Discord REST API.
//!
//! The [`DiscordTransport`] trait is the seam between the history services and
//! the network. [`HttpTransport`] is the reqwest-backed implementation used in
//! production; tests script responses through an in-memory mock instead.
//!
//! Request pacing lives in [`Pacer`], which the paginator consults before every
//! page request so that the same delay policy applies whatever transport is
//! plugged in.

pub mod http;
pub mod pacing;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;

pub use http::HttpTransport;
pub use pacing::Pacer;

/// Issues a GET request and returns the decoded JSON body.
///
/// Implementations attach the credential and JSON content type to every
/// request. They do not retry; a failed request is reported once and the
/// caller decides how to recover.
#[async_trait]
pub trait DiscordTransport: Send + Sync {
    /// # Arguments
    /// - `path` - Path relative to the API base, without leading slash (`channels/1/messages`)
    /// - `query` - Query string parameters
    ///
    /// # Returns
    /// - `Ok(Value)` - Successful response body, whatever its JSON shape
    /// - `Err(TransportError)` - Network failure, non-success status, rate limit or undecodable body
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError>;
}
