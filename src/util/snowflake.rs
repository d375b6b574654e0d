//! Snowflake codec.
//!
//! Discord identifiers are 64-bit integers whose upper 42 bits hold the
//! milliseconds elapsed since the Discord epoch (2015-01-01T00:00:00Z). The
//! remaining 22 bits hold worker, process and sequence counters. Decoding a
//! snowflake therefore yields its creation instant, which lets an id stand in
//! for a timestamp when a payload lacks one.

use chrono::{DateTime, TimeZone, Utc};

use crate::{error::FormatError, util::parse::parse_snowflake};

/// Discord epoch in milliseconds since the Unix epoch.
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Number of low bits holding worker/process/sequence data.
const TIMESTAMP_SHIFT: u32 = 22;

/// Decodes the creation instant of a snowflake given as a string.
///
/// # Arguments
/// - `id` - Snowflake in base-10 string form
///
/// # Returns
/// - `Ok(DateTime<Utc>)` - Creation instant with millisecond precision
/// - `Err(FormatError::InvalidSnowflake)` - The id is not numeric
pub fn to_instant(id: &str) -> Result<DateTime<Utc>, FormatError> {
    instant_of(parse_snowflake(id)?)
}

/// Decodes the creation instant of a snowflake in the given time zone.
pub fn to_instant_in<Tz: TimeZone>(id: &str, tz: &Tz) -> Result<DateTime<Tz>, FormatError> {
    to_instant(id).map(|instant| instant.with_timezone(tz))
}

/// Decodes the creation instant of an already-parsed snowflake.
pub fn instant_of(id: u64) -> Result<DateTime<Utc>, FormatError> {
    // id >> 22 fits in 42 bits so the addition cannot overflow i64
    let millis = (id >> TIMESTAMP_SHIFT) as i64 + DISCORD_EPOCH_MS;

    DateTime::from_timestamp_millis(millis).ok_or(FormatError::OutOfRange { value: id })
}

/// Encodes the smallest snowflake created at `instant`.
///
/// Worker and sequence bits are zero, so the result sorts before every real
/// id created in the same millisecond. Instants before the Discord epoch clamp
/// to `0`.
pub fn from_instant(instant: DateTime<Utc>) -> u64 {
    let millis = instant.timestamp_millis() - DISCORD_EPOCH_MS;
    if millis <= 0 {
        return 0;
    }

    (millis as u64) << TIMESTAMP_SHIFT
}
