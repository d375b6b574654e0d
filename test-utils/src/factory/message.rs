//! Message payload factory.
//!
//! Builds the JSON objects returned by `channels/{id}/messages` with sensible
//! defaults. Ids are derived from the creation instant so that the snowflake
//! and the `timestamp` field agree unless a test overrides one of them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::factory::helpers::{next_id, snowflake_at};

/// Factory for creating message payloads with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::message::MessageFactory;
///
/// let message = MessageFactory::new()
///     .content("hello")
///     .author("9", "alice")
///     .attachment("1", "cat.png", "https://cdn.example/cat.png")
///     .build();
/// ```
pub struct MessageFactory {
    id: Option<u64>,
    sequence: u64,
    content: String,
    author_id: String,
    username: String,
    global_name: Option<String>,
    timestamp: DateTime<Utc>,
    flags: u64,
    attachments: Vec<Value>,
    reactions: Vec<Value>,
    embeds: Vec<Value>,
    removed: Vec<&'static str>,
}

impl MessageFactory {
    /// Creates a new MessageFactory with default values.
    ///
    /// Defaults:
    /// - id: snowflake derived from the timestamp
    /// - content: `"Message {n}"`
    /// - author: id `"1000"`, username `"user"`, no global name
    /// - timestamp: 2024-01-01T00:00:00Z
    /// - flags: `0`, no attachments, reactions or embeds
    pub fn new() -> Self {
        let sequence = next_id();
        Self {
            id: None,
            sequence,
            content: format!("Message {}", sequence),
            author_id: "1000".to_string(),
            username: "user".to_string(),
            global_name: None,
            timestamp: DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default(),
            flags: 0,
            attachments: Vec::new(),
            reactions: Vec::new(),
            embeds: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Sets an explicit id instead of deriving it from the timestamp.
    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn author(mut self, id: impl Into<String>, username: impl Into<String>) -> Self {
        self.author_id = id.into();
        self.username = username.into();
        self
    }

    pub fn global_name(mut self, global_name: impl Into<String>) -> Self {
        self.global_name = Some(global_name.into());
        self
    }

    /// Sets the creation instant used for both `timestamp` and the derived id.
    pub fn created_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn flags(mut self, flags: u64) -> Self {
        self.flags = flags;
        self
    }

    /// Marks the message as soft-deleted (flag bit 2).
    pub fn deleted(self) -> Self {
        let flags = self.flags | (1 << 2);
        self.flags(flags)
    }

    pub fn attachment(mut self, id: &str, filename: &str, url: &str) -> Self {
        self.attachments.push(json!({
            "id": id,
            "filename": filename,
            "url": url,
            "proxy_url": url,
            "content_type": "image/png",
            "size": 1024,
        }));
        self
    }

    pub fn reaction(mut self, emoji_name: &str, count: u64, me: bool) -> Self {
        self.reactions.push(json!({
            "emoji": { "id": null, "name": emoji_name },
            "count": count,
            "me": me,
        }));
        self
    }

    pub fn embed(mut self, embed: Value) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Drops a top-level key from the built payload to simulate malformed data.
    pub fn without(mut self, key: &'static str) -> Self {
        self.removed.push(key);
        self
    }

    /// Id the built payload will carry.
    pub fn snowflake(&self) -> u64 {
        self.id
            .unwrap_or_else(|| snowflake_at(self.timestamp, self.sequence))
    }

    /// Builds the message payload.
    ///
    /// # Returns
    /// - `Value` - JSON object shaped like a Discord message
    pub fn build(self) -> Value {
        let mut message = Map::new();
        message.insert("id".into(), json!(self.snowflake().to_string()));
        message.insert("type".into(), json!(0));
        message.insert("content".into(), json!(self.content));
        message.insert(
            "author".into(),
            json!({
                "id": self.author_id,
                "username": self.username,
                "global_name": self.global_name,
                "discriminator": "0",
            }),
        );
        message.insert(
            "timestamp".into(),
            json!(self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, false)),
        );
        message.insert("edited_timestamp".into(), Value::Null);
        message.insert("flags".into(), json!(self.flags));
        message.insert("attachments".into(), Value::Array(self.attachments));
        message.insert("reactions".into(), Value::Array(self.reactions));
        message.insert("embeds".into(), Value::Array(self.embeds));

        for key in self.removed {
            message.remove(key);
        }

        Value::Object(message)
    }
}

impl Default for MessageFactory {
    fn default() -> Self {
        Self::new()
    }
}
