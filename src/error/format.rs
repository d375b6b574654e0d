use std::num::ParseIntError;
use thiserror::Error;

/// A snowflake identifier or timestamp string could not be parsed.
///
/// Raised by the snowflake codec and timestamp helpers and propagated to the
/// immediate caller.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Failure to parse a snowflake from String
    #[error("Failed to parse snowflake from String '{value}': {source}")]
    InvalidSnowflake {
        /// The string value that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: ParseIntError,
    },

    /// Failure to parse an ISO-8601 timestamp
    #[error("Failed to parse timestamp '{value}': {source}")]
    InvalidTimestamp {
        /// The string value that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: chrono::ParseError,
    },

    /// Decoded instant cannot be represented as a date
    #[error("Snowflake {value} decodes to an unrepresentable instant")]
    OutOfRange {
        /// The snowflake that was decoded
        value: u64,
    },

    /// Requested time span is negative or too large to represent
    #[error("Invalid time span of {hours} hours")]
    InvalidSpan {
        /// The requested number of hours
        hours: i64,
    },
}
