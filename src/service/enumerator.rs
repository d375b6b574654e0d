//! Channel discovery and fan-out across channels.
//!
//! The enumerator lists a guild's text channels or the account's direct
//! message channels and runs page fetches or full walks over each of them.
//! Channels are independent: a channel whose listing entry, page response or
//! individual messages are malformed contributes nothing (or less), and the
//! remaining channels are still processed. Results keep the server's channel
//! listing order and are never re-sorted across channels.

use chrono::{DateTime, Utc};
use dioxus_logger::tracing;
use futures::{stream, StreamExt};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{
    error::TransportAnomaly,
    model::{Channel, ChannelKind, NormalizedMessage, RawMessage, TimeWindow},
    service::{
        normalizer::MessageNormalizer,
        paginator::{HistoryPaginator, PageOutcome},
    },
};

#[derive(Clone)]
pub struct ChannelEnumerator {
    paginator: HistoryPaginator,
    normalizer: MessageNormalizer,
    /// Number of channels processed at once
    concurrency: usize,
    cancel: CancellationToken,
}

impl ChannelEnumerator {
    /// Creates an enumerator that processes one channel at a time.
    ///
    /// Listings and pages both go through `paginator`, so they share its
    /// transport and pacing.
    pub fn new(paginator: HistoryPaginator, normalizer: MessageNormalizer) -> Self {
        Self {
            paginator,
            normalizer,
            concurrency: 1,
            cancel: CancellationToken::new(),
        }
    }

    /// Processes up to `concurrency` channels at once. Walks within a single
    /// channel stay sequential regardless.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Threads `cancel` through every page request made by this enumerator.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Lists the text channels of a guild, in server order.
    pub async fn list_guild_channels(&self, guild_id: u64) -> Vec<Channel> {
        self.list_channels(&format!("guilds/{}/channels", guild_id), ChannelKind::Text)
            .await
    }

    /// Lists the account's direct message channels, in server order.
    pub async fn list_direct_channels(&self) -> Vec<Channel> {
        self.list_channels("users/@me/channels", ChannelKind::Direct)
            .await
    }

    /// Recent messages across every text channel of a guild.
    ///
    /// Fetches only the most recent page of each channel and keeps messages
    /// newer than the window cutoff. Each record carries its channel's name.
    ///
    /// # Arguments
    /// - `guild_id` - Guild to scan
    /// - `window` - How far back to keep messages, usually the last 24 hours
    ///
    /// # Returns
    /// - `Vec<NormalizedMessage>` - Messages grouped by channel in listing order,
    ///   newest first within each channel
    pub async fn recent_across_guild(
        &self,
        guild_id: u64,
        window: TimeWindow,
    ) -> Vec<NormalizedMessage> {
        let cutoff = window.cutoff(self.paginator.now());
        let channels = self.list_guild_channels(guild_id).await;

        let per_channel: Vec<Vec<NormalizedMessage>> = stream::iter(channels.iter())
            .map(|channel| self.recent_in_channel(channel, cutoff))
            .buffered(self.concurrency)
            .collect()
            .await;

        let messages: Vec<NormalizedMessage> = per_channel.into_iter().flatten().collect();

        tracing::info!(
            "Collected {} recent messages from {} channels in guild {}",
            messages.len(),
            channels.len(),
            guild_id
        );

        messages
    }

    /// Full paginated history of every text channel of a guild within `window`.
    pub async fn history_across_guild(
        &self,
        guild_id: u64,
        window: TimeWindow,
    ) -> Vec<NormalizedMessage> {
        let channels = self.list_guild_channels(guild_id).await;

        let per_channel: Vec<Vec<NormalizedMessage>> = stream::iter(channels.iter())
            .map(|channel| async move {
                let mut messages = self.channel_history(channel.id, window).await;
                for message in &mut messages {
                    message.channel_name = channel.name.clone();
                }
                messages
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        per_channel.into_iter().flatten().collect()
    }

    /// Normalized history of a single channel within `window`.
    pub async fn channel_history(
        &self,
        channel_id: u64,
        window: TimeWindow,
    ) -> Vec<NormalizedMessage> {
        let walk = self.paginator.walk(channel_id, window, &self.cancel).await;
        self.normalizer.clean_all(&walk.messages)
    }

    /// Most recent page of every direct message channel, concatenated.
    pub async fn all_direct_messages(&self) -> Vec<RawMessage> {
        let channels = self.list_direct_channels().await;

        let per_channel: Vec<Vec<RawMessage>> = stream::iter(channels.iter())
            .map(|channel| async move {
                match self.paginator.fetch_page(channel.id, None, &self.cancel).await {
                    PageOutcome::Page(page) => page,
                    PageOutcome::EndOfHistory | PageOutcome::Cancelled => Vec::new(),
                    PageOutcome::Anomaly(anomaly) => {
                        tracing::warn!(
                            "Unexpected response for DM channel {}: {}",
                            channel.id,
                            anomaly
                        );
                        Vec::new()
                    }
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        per_channel.into_iter().flatten().collect()
    }

    async fn recent_in_channel(
        &self,
        channel: &Channel,
        cutoff: DateTime<Utc>,
    ) -> Vec<NormalizedMessage> {
        let page = match self.paginator.fetch_page(channel.id, None, &self.cancel).await {
            PageOutcome::Page(page) => page,
            PageOutcome::EndOfHistory | PageOutcome::Cancelled => return Vec::new(),
            PageOutcome::Anomaly(anomaly) => {
                tracing::warn!(
                    "Unexpected response for channel {} ({}): {}",
                    channel.id,
                    channel.display_name(),
                    anomaly
                );
                return Vec::new();
            }
        };

        let mut recent = Vec::new();
        for message in &page {
            let created = match message.timestamp() {
                Ok(created) => created,
                Err(e) => {
                    tracing::warn!(
                        "Skipping message in channel {} (key {}): {}",
                        channel.id,
                        e.key().unwrap_or("-"),
                        e
                    );
                    continue;
                }
            };
            if created <= cutoff {
                continue;
            }

            match self.normalizer.clean(message) {
                Ok(Some(mut cleaned)) => {
                    cleaned.channel_name = channel.name.clone();
                    recent.push(cleaned);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        "Skipping message in channel {} (key {}): {}",
                        channel.id,
                        e.key().unwrap_or("-"),
                        e
                    );
                }
            }
        }

        recent
    }

    async fn list_channels(&self, path: &str, kind: ChannelKind) -> Vec<Channel> {
        let Some(response) = self.paginator.paced_get(path, &[], &self.cancel).await else {
            return Vec::new();
        };

        let items = match response {
            Ok(Value::Array(items)) => items,
            Ok(other) => {
                tracing::warn!(
                    "Unexpected channel listing from {}: {}",
                    path,
                    TransportAnomaly::malformed(&other)
                );
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Failed to list channels from {}: {}", path, e);
                return Vec::new();
            }
        };

        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Channel>(item) {
                Ok(channel) => Some(channel),
                Err(e) => {
                    tracing::warn!("Skipping unreadable channel entry from {}: {}", path, e);
                    None
                }
            })
            .filter(|channel| channel.kind() == kind)
            .collect()
    }
}
