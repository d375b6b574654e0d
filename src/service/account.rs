use serde::de::DeserializeOwned;

use crate::{
    error::TransportError,
    model::{CurrentUser, PartialGuild},
    transport::DiscordTransport,
};

/// Single-shot lookups about the account behind the credential.
///
/// Unlike history walks these propagate failures: they are used to check
/// that the credential works before anything else runs.
pub struct AccountService<'a> {
    transport: &'a dyn DiscordTransport,
}

impl<'a> AccountService<'a> {
    pub fn new(transport: &'a dyn DiscordTransport) -> Self {
        Self { transport }
    }

    /// Fetches the account the credential belongs to.
    ///
    /// # Returns
    /// - `Ok(CurrentUser)` - Account id, username and display name
    /// - `Err(TransportError)` - Request failed, credential rejected or body unreadable
    pub async fn current_user(&self) -> Result<CurrentUser, TransportError> {
        self.get_json("users/@me").await
    }

    /// Lists the guilds the account is a member of.
    pub async fn guilds(&self) -> Result<Vec<PartialGuild>, TransportError> {
        self.get_json("users/@me/guilds").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let body = self.transport.get(path, &[]).await?;
        Ok(serde_json::from_value(body)?)
    }
}
