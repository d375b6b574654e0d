use dioxus_logger::tracing;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::RecordShapeError,
    model::{MessageAttachment, MessageAuthor, MessageReaction, NormalizedMessage, RawMessage},
};

/// Which optional sections of a message to keep.
///
/// All sections are included by default; soft-deleted messages are dropped by
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    pub include_attachments: bool,
    pub include_reactions: bool,
    pub include_embeds: bool,
    pub include_deleted: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            include_attachments: true,
            include_reactions: true,
            include_embeds: true,
            include_deleted: false,
        }
    }
}

/// Reshapes raw message payloads into [`NormalizedMessage`] records.
#[derive(Debug, Clone, Default)]
pub struct MessageNormalizer {
    options: NormalizeOptions,
}

impl MessageNormalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Cleans a single message.
    ///
    /// # Arguments
    /// - `message` - Raw payload from the messages endpoint
    ///
    /// # Returns
    /// - `Ok(Some(NormalizedMessage))` - Message in the stable output shape
    /// - `Ok(None)` - Message is soft-deleted and deleted messages are excluded
    /// - `Err(RecordShapeError)` - A required key is missing or has the wrong type
    pub fn clean(&self, message: &RawMessage) -> Result<Option<NormalizedMessage>, RecordShapeError> {
        if !self.options.include_deleted && message.is_deleted() {
            return Ok(None);
        }

        let object = message.object()?;

        let author = match object.get("author") {
            None | Some(Value::Null) => return Err(RecordShapeError::MissingKey { key: "author" }),
            Some(Value::Object(author)) => author,
            Some(_) => return Err(RecordShapeError::InvalidField { key: "author" }),
        };

        let mut cleaned = NormalizedMessage {
            id: str_field(object, "id", "id")?,
            content: str_field(object, "content", "content")?,
            author: MessageAuthor {
                id: str_field(author, "id", "author.id")?,
                username: str_field(author, "username", "author.username")?,
                global_name: optional_str(author, "global_name"),
            },
            timestamp: str_field(object, "timestamp", "timestamp")?,
            attachments: None,
            reactions: None,
            embeds: None,
            channel_name: None,
        };

        if self.options.include_attachments {
            if let Some(items) = section(object, "attachments") {
                cleaned.attachments = Some(
                    items
                        .iter()
                        .map(project_attachment)
                        .collect::<Result<_, _>>()?,
                );
            }
        }

        if self.options.include_reactions {
            if let Some(items) = section(object, "reactions") {
                cleaned.reactions = Some(
                    items
                        .iter()
                        .map(project_reaction)
                        .collect::<Result<_, _>>()?,
                );
            }
        }

        if self.options.include_embeds {
            if let Some(items) = section(object, "embeds") {
                cleaned.embeds = Some(items.clone());
            }
        }

        Ok(Some(cleaned))
    }

    /// Cleans a batch, skipping omitted messages and logging malformed ones.
    ///
    /// Output order follows input order.
    pub fn clean_all(&self, messages: &[RawMessage]) -> Vec<NormalizedMessage> {
        messages
            .iter()
            .filter_map(|message| match self.clean(message) {
                Ok(cleaned) => cleaned,
                Err(e) => {
                    let id = message
                        .field("id")
                        .and_then(Value::as_str)
                        .unwrap_or("<unknown>");
                    tracing::warn!("Skipping message {}: {}", id, e);
                    None
                }
            })
            .collect()
    }
}

/// Non-empty list under `key`; absent, null, empty or non-list sections are skipped.
fn section<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Vec<Value>> {
    object
        .get(key)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
}

fn str_field(
    object: &Map<String, Value>,
    key: &str,
    label: &'static str,
) -> Result<String, RecordShapeError> {
    match object.get(key) {
        None | Some(Value::Null) => Err(RecordShapeError::MissingKey { key: label }),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(RecordShapeError::InvalidField { key: label }),
    }
}

fn optional_str(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn project_attachment(item: &Value) -> Result<MessageAttachment, RecordShapeError> {
    let attachment = item
        .as_object()
        .ok_or(RecordShapeError::InvalidField { key: "attachments" })?;

    Ok(MessageAttachment {
        id: str_field(attachment, "id", "attachments.id")?,
        filename: str_field(attachment, "filename", "attachments.filename")?,
        url: str_field(attachment, "url", "attachments.url")?,
        content_type: optional_str(attachment, "content_type"),
        size: attachment.get("size").and_then(Value::as_u64),
    })
}

fn project_reaction(item: &Value) -> Result<MessageReaction, RecordShapeError> {
    let reaction = item
        .as_object()
        .ok_or(RecordShapeError::InvalidField { key: "reactions" })?;

    let emoji = match reaction.get("emoji") {
        None | Some(Value::Null) => {
            return Err(RecordShapeError::MissingKey {
                key: "reactions.emoji",
            })
        }
        Some(emoji) => emoji.clone(),
    };
    let count = match reaction.get("count") {
        None | Some(Value::Null) => {
            return Err(RecordShapeError::MissingKey {
                key: "reactions.count",
            })
        }
        Some(count) => count.as_u64().ok_or(RecordShapeError::InvalidField {
            key: "reactions.count",
        })?,
    };

    Ok(MessageReaction {
        emoji,
        count,
        me: reaction.get("me").and_then(Value::as_bool).unwrap_or(false),
    })
}
