//! Discord message history retrieval.
//!
//! This crate walks the Discord REST API backward through time to rebuild a
//! bounded window of conversation history for a channel, a whole guild or the
//! account's direct messages. It tolerates partial and malformed responses,
//! rate limits and snowflake-encoded identifiers, and always prefers returning
//! what could be gathered over failing outright.
//!
//! # Architecture
//!
//! - **Transport** (`transport/`) - Authenticated GET requests and request pacing
//! - **Service Layer** (`service/`) - Pagination, channel enumeration, normalization
//! - **Model Layer** (`model/`) - Channels, raw and normalized messages, time windows
//! - **Error Layer** (`error/`) - Error taxonomy separating propagated from recovered failures
//! - **Utilities** (`util/`) - Snowflake codec, parsing helpers, injectable clock
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based configuration and credential
//! - **Startup** (`startup`) - Construction of the HTTP client and service graph
//!
//! # Request Flow
//!
//! 1. **Enumerator** lists the channels to scan through the transport
//! 2. **Paginator** requests pages per channel, pacing every request
//! 3. **Normalizer** reshapes each raw message into the output record
//! 4. **Enumerator** concatenates per-channel results in listing order

pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod startup;
pub mod transport;
pub mod util;
