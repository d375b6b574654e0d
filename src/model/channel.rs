use serde::{Deserialize, Serialize};
use serenity::all::ChannelType;

use crate::util::parse::{deserialize_snowflake, serialize_snowflake};

/// Channel as listed by `guilds/{id}/channels` or `users/@me/channels`.
///
/// Only the fields enumeration needs are kept; everything else in the payload
/// is ignored during deserialization. Direct-message channels carry no name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(
        deserialize_with = "deserialize_snowflake",
        serialize_with = "serialize_snowflake"
    )]
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
}

/// Coarse channel classification used by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Guild text channel (type 0)
    Text,
    /// One-to-one direct message channel (type 1)
    Direct,
    /// Voice, category, forum, thread and anything else; ignored by enumeration
    Other,
}

impl Channel {
    pub fn kind(&self) -> ChannelKind {
        match self.channel_type {
            ChannelType::Text => ChannelKind::Text,
            ChannelType::Private => ChannelKind::Direct,
            _ => ChannelKind::Other,
        }
    }

    /// Name used in logs and output; falls back to the id for unnamed channels.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}
