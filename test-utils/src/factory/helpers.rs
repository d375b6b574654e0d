//! Shared helper utilities for factory methods.
//!
//! This module provides ID generation used across all factory modules. Ids
//! are real snowflakes so that code decoding creation instants from ids sees
//! consistent values.

use chrono::{DateTime, Utc};

/// Discord epoch in milliseconds since the Unix epoch.
const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Counter for generating unique IDs in tests.
///
/// This atomic counter ensures each factory-created payload gets a unique
/// identifier to prevent collisions in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Builds a snowflake created at `instant` with the given low bits.
///
/// Only the low 22 bits of `sequence` are used.
///
/// # Arguments
/// - `instant` - Creation instant encoded in the upper bits
/// - `sequence` - Worker/sequence bits, used to keep ids unique within a millisecond
///
/// # Returns
/// - `u64` - Snowflake that decodes back to `instant`
pub fn snowflake_at(instant: DateTime<Utc>, sequence: u64) -> u64 {
    let millis = (instant.timestamp_millis() - DISCORD_EPOCH_MS).max(0) as u64;
    (millis << 22) | (sequence & 0x3F_FFFF)
}
