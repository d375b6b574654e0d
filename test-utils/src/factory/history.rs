//! Channel history generation.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::factory::message::MessageFactory;

/// Creates `count` messages spaced `spacing` apart, newest first.
///
/// The newest message is created at `newest`; each following message is one
/// `spacing` older. Ids are derived from the creation instants, so they
/// strictly decrease along the returned list as Discord's ordering does.
///
/// # Arguments
/// - `newest` - Creation instant of the first (newest) message
/// - `count` - Number of messages to create
/// - `spacing` - Time between consecutive messages
///
/// # Returns
/// - `Vec<Value>` - Message payloads, newest first
pub fn create_history(newest: DateTime<Utc>, count: usize, spacing: Duration) -> Vec<Value> {
    (0..count)
        .map(|i| {
            MessageFactory::new()
                .created_at(newest - spacing * i as i32)
                .content(format!("message {}", i))
                .build()
        })
        .collect()
}
