//! Test factories for channel listing payloads.
//!
//! Each function returns the JSON object Discord would include in a
//! `guilds/{id}/channels` or `users/@me/channels` response.

use serde_json::{json, Value};

/// Guild text channel (type 0).
pub fn create_text_channel(channel_id: u64, name: &str) -> Value {
    json!({
        "id": channel_id.to_string(),
        "type": 0,
        "name": name,
        "position": 0,
        "nsfw": false,
        "parent_id": null,
        "permission_overwrites": [],
    })
}

/// Guild voice channel (type 2); ignored by enumeration.
pub fn create_voice_channel(channel_id: u64, name: &str) -> Value {
    json!({
        "id": channel_id.to_string(),
        "type": 2,
        "name": name,
        "bitrate": 64000,
        "user_limit": 0,
    })
}

/// Guild category (type 4); ignored by enumeration.
pub fn create_category(channel_id: u64, name: &str) -> Value {
    json!({
        "id": channel_id.to_string(),
        "type": 4,
        "name": name,
    })
}

/// Direct message channel (type 1) with a single recipient and no name.
pub fn create_dm_channel(channel_id: u64, recipient_username: &str) -> Value {
    json!({
        "id": channel_id.to_string(),
        "type": 1,
        "last_message_id": null,
        "recipients": [{
            "id": "900000000000000000",
            "username": recipient_username,
            "global_name": null,
        }],
    })
}
