use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::RecordShapeError,
    util::{
        parse::{parse_snowflake, parse_timestamp},
        snowflake,
        text::truncate_for_log,
    },
};

/// Message flag bit marking a soft-deleted message.
pub const DELETED_FLAG: u64 = 1 << 2;

/// Unprocessed message payload as returned by `channels/{id}/messages`.
///
/// Kept as untyped JSON so a single malformed message can be detected and
/// skipped without failing deserialization of the whole page. Typed access
/// goes through the accessor methods, which report the offending key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMessage(Value);

impl RawMessage {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Underlying JSON object, or `NotAnObject` for anything else.
    pub fn object(&self) -> Result<&Map<String, Value>, RecordShapeError> {
        self.0.as_object().ok_or_else(|| {
            RecordShapeError::NotAnObject(truncate_for_log(&self.0.to_string(), 80))
        })
    }

    /// Returns the value under `key`, if the payload is an object that has it.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Returns the string under `key` or a shape error naming the key.
    pub fn require_str(&self, key: &'static str) -> Result<&str, RecordShapeError> {
        match self.object()?.get(key) {
            None | Some(Value::Null) => Err(RecordShapeError::MissingKey { key }),
            Some(value) => value
                .as_str()
                .ok_or(RecordShapeError::InvalidField { key }),
        }
    }

    /// Message snowflake.
    pub fn id(&self) -> Result<u64, RecordShapeError> {
        let raw = self.require_str("id")?;
        parse_snowflake(raw).map_err(|_| RecordShapeError::InvalidField { key: "id" })
    }

    /// Server-provided creation timestamp, parsed strictly.
    pub fn timestamp(&self) -> Result<DateTime<Utc>, RecordShapeError> {
        let raw = self.require_str("timestamp")?;
        Ok(parse_timestamp(raw)?)
    }

    /// Creation instant, preferring the `timestamp` field and falling back to
    /// decoding the id when the timestamp is absent or unparsable.
    pub fn created_at(&self) -> Result<DateTime<Utc>, RecordShapeError> {
        match self.timestamp() {
            Ok(instant) => Ok(instant),
            Err(timestamp_err) => {
                let id = self.id().map_err(|_| timestamp_err)?;
                Ok(snowflake::instant_of(id)?)
            }
        }
    }

    /// Message flags bitfield; absent or non-numeric flags read as `0`.
    pub fn flags(&self) -> u64 {
        self.field("flags").and_then(Value::as_u64).unwrap_or(0)
    }

    pub fn is_deleted(&self) -> bool {
        self.flags() & DELETED_FLAG != 0
    }
}

impl From<Value> for RawMessage {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Message author as kept in normalized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAuthor {
    pub id: String,
    pub username: String,
    pub global_name: Option<String>,
}

/// Attachment projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAttachment {
    pub id: String,
    pub filename: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size: Option<u64>,
}

/// Reaction projection; `emoji` is passed through as the server sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageReaction {
    pub emoji: Value,
    pub count: u64,
    /// Whether the requesting account reacted
    pub me: bool,
}

/// Stable output shape produced by the normalizer.
///
/// `id`, `content`, `author` and `timestamp` are always present. Optional
/// sections appear only when enabled and present in the source record, and
/// are omitted from serialized output otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    pub id: String,
    pub content: String,
    pub author: MessageAuthor,
    /// ISO-8601 timestamp exactly as received
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<MessageAttachment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Vec<MessageReaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Value>>,
    /// Name of the channel the message came from, set by guild-wide scans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn reads_core_fields() {
        let message = RawMessage::new(json!({
            "id": "100",
            "timestamp": "2024-01-01T00:00:00Z",
            "flags": 4,
        }));

        assert_eq!(message.id().unwrap(), 100);
        assert_eq!(
            message.timestamp().unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert!(message.is_deleted());
    }

    #[test]
    fn missing_flags_read_as_zero() {
        let message = RawMessage::new(json!({"id": "1", "flags": null}));
        assert_eq!(message.flags(), 0);
        assert!(!message.is_deleted());
    }

    #[test]
    fn reports_missing_and_invalid_keys() {
        let message = RawMessage::new(json!({"id": 5}));

        assert!(matches!(
            message.timestamp(),
            Err(RecordShapeError::MissingKey { key: "timestamp" })
        ));
        assert!(matches!(
            message.id(),
            Err(RecordShapeError::InvalidField { key: "id" })
        ));
    }

    #[test]
    fn non_object_is_rejected() {
        let message = RawMessage::new(json!("just a string"));
        assert!(matches!(message.id(), Err(RecordShapeError::NotAnObject(_))));
    }

    #[test]
    fn created_at_falls_back_to_snowflake() {
        let message = RawMessage::new(json!({"id": "175928847299117063"}));
        assert_eq!(
            message.created_at().unwrap().timestamp_millis(),
            1_462_015_105_796
        );

        let garbled = RawMessage::new(json!({
            "id": "175928847299117063",
            "timestamp": "not a date",
        }));
        assert_eq!(
            garbled.created_at().unwrap().timestamp_millis(),
            1_462_015_105_796
        );
    }

    #[test]
    fn created_at_without_id_or_timestamp_fails() {
        let message = RawMessage::new(json!({"content": "hi"}));
        assert!(message.created_at().is_err());
    }
}
