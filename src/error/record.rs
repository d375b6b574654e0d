use thiserror::Error;

use crate::error::format::FormatError;

/// An individual message is missing an expected key or carries an unusable value.
///
/// Recovered per message: the offending record is skipped and the key is logged.
#[derive(Error, Debug)]
pub enum RecordShapeError {
    /// Record is not a JSON object at all
    #[error("Expected message object, got {0}")]
    NotAnObject(String),

    /// Required key is absent
    #[error("Missing key in message data: {key}")]
    MissingKey { key: &'static str },

    /// Key is present but holds the wrong JSON type
    #[error("Invalid value for key {key} in message data")]
    InvalidField { key: &'static str },

    /// The `timestamp` field cannot be parsed
    #[error("Error parsing timestamp: {0}")]
    Timestamp(#[from] FormatError),
}

impl RecordShapeError {
    /// Name of the key involved, when the error concerns a single key.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::MissingKey { key } | Self::InvalidField { key } => Some(*key),
            Self::Timestamp(_) => Some("timestamp"),
            Self::NotAnObject(_) => None,
        }
    }
}
