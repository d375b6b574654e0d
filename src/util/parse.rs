use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::FormatError;

/// Parses a snowflake from String
///
/// # Arguments
/// - `value` - The string to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed snowflake
/// - `Err(FormatError::InvalidSnowflake)` - The string is not a base-10 `u64`
pub fn parse_snowflake(value: &str) -> Result<u64, FormatError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| FormatError::InvalidSnowflake {
            value: value.to_string(),
            source: e,
        })
}

/// Parses an ISO-8601 timestamp as emitted by Discord into UTC.
///
/// Accepts both the `Z` suffix and explicit offsets, with or without
/// fractional seconds (`2024-01-01T00:00:00Z`, `2024-01-01T00:00:00.000000+00:00`).
///
/// # Returns
/// - `Ok(DateTime<Utc>)` - Parsed instant normalized to UTC
/// - `Err(FormatError::InvalidTimestamp)` - The string is not RFC 3339
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, FormatError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| FormatError::InvalidTimestamp {
            value: value.to_string(),
            source: e,
        })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(u64),
}

/// Serde helper accepting a snowflake encoded either as a JSON string or number.
pub fn deserialize_snowflake<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => parse_snowflake(&s).map_err(serde::de::Error::custom),
        StringOrNumber::Number(n) => Ok(n),
    }
}

/// Serde helper writing a snowflake back as a JSON string, the way Discord does.
pub fn serialize_snowflake<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}
