//! Backward pagination over a channel's message history.
//!
//! A walk starts at the most recent page and repeatedly asks for the page of
//! messages strictly older than the oldest message seen so far, until the
//! oldest message of a page predates the window cutoff or the history runs
//! out. The cutoff is checked once per page, so a walk can include up to one
//! page of messages older than the cutoff.

use chrono::{DateTime, Utc};
use dioxus_logger::tracing;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{TransportAnomaly, TransportError},
    model::{RawMessage, TimeWindow},
    transport::{DiscordTransport, Pacer},
    util::clock::{system_clock, Clock},
};

/// Maximum number of messages Discord returns per page.
pub const PAGE_LIMIT: u8 = 100;

/// Result of a single page request.
#[derive(Debug)]
pub enum PageOutcome {
    /// Non-empty list of messages, newest first
    Page(Vec<RawMessage>),
    /// Valid but empty list: nothing older exists
    EndOfHistory,
    /// Request failed or the body was not a list
    Anomaly(TransportAnomaly),
    /// Cancellation was requested before the page arrived
    Cancelled,
}

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStop {
    /// Oldest message of the last page predates the cutoff
    Cutoff,
    /// Server returned an empty page
    EndOfHistory,
    /// A page request failed or returned something other than a list
    Anomaly,
    /// Cancellation was requested
    Cancelled,
    /// A page's oldest id was not older than the previous cursor
    CursorStalled,
    /// A page's oldest message has no usable id to continue from
    MalformedCursor,
}

/// Messages gathered by a walk, newest first, together with why it stopped.
#[derive(Debug)]
pub struct HistoryWalk {
    pub messages: Vec<RawMessage>,
    pub stop: WalkStop,
    pub pages: usize,
}

/// Walks channel histories backward page by page.
///
/// Cheap to clone; clones share the transport and pacer.
#[derive(Clone)]
pub struct HistoryPaginator {
    transport: Arc<dyn DiscordTransport>,
    pacer: Arc<Pacer>,
    clock: Clock,
    page_limit: u8,
}

impl HistoryPaginator {
    pub fn new(transport: Arc<dyn DiscordTransport>, pacer: Arc<Pacer>) -> Self {
        Self {
            transport,
            pacer,
            clock: system_clock(),
            page_limit: PAGE_LIMIT,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the page size, clamped to the `1..=100` range Discord accepts.
    pub fn with_page_limit(mut self, limit: u8) -> Self {
        self.page_limit = limit.clamp(1, PAGE_LIMIT);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Fetches every message in `window`, newest first.
    ///
    /// May include up to one page of messages older than the cutoff. Never
    /// fails: transport anomalies end the walk and whatever was gathered up to
    /// that point is returned.
    pub async fn fetch_until(&self, channel_id: u64, window: TimeWindow) -> Vec<RawMessage> {
        self.walk(channel_id, window, &CancellationToken::new())
            .await
            .messages
    }

    /// Fetches every message created since `start`, newest first.
    pub async fn fetch_since(&self, channel_id: u64, start: DateTime<Utc>) -> Vec<RawMessage> {
        self.fetch_until(channel_id, TimeWindow::Since(start)).await
    }

    /// Walks `channel_id` backward until the window cutoff, end of history,
    /// an anomaly or cancellation.
    ///
    /// Pages are requested strictly one after another since each cursor
    /// depends on the previous page. On cancellation the pages gathered so far
    /// are returned unchanged.
    ///
    /// # Arguments
    /// - `channel_id` - Channel to walk
    /// - `window` - How far back to go
    /// - `cancel` - Checked between pages and raced against the in-flight request
    ///
    /// # Returns
    /// - `HistoryWalk` - Gathered messages, number of pages and the stop reason
    pub async fn walk(
        &self,
        channel_id: u64,
        window: TimeWindow,
        cancel: &CancellationToken,
    ) -> HistoryWalk {
        let cutoff = window.cutoff(self.now());
        let mut messages: Vec<RawMessage> = Vec::new();
        let mut cursor: Option<u64> = None;
        let mut pages = 0;

        let stop = loop {
            let page = match self.fetch_page(channel_id, cursor, cancel).await {
                PageOutcome::Page(page) => page,
                PageOutcome::EndOfHistory => {
                    tracing::debug!("No more messages found for channel {}", channel_id);
                    break WalkStop::EndOfHistory;
                }
                PageOutcome::Anomaly(anomaly) => {
                    tracing::warn!(
                        "Stopping walk of channel {} after {} pages: {}",
                        channel_id,
                        pages,
                        anomaly
                    );
                    break WalkStop::Anomaly;
                }
                PageOutcome::Cancelled => break WalkStop::Cancelled,
            };

            pages += 1;
            tracing::debug!(
                "Got {} messages from channel {} (round {})",
                page.len(),
                channel_id,
                pages
            );

            let Some((oldest_id, oldest_instant)) =
                page.last().map(|m| (m.id(), m.created_at()))
            else {
                break WalkStop::EndOfHistory;
            };

            let next_cursor = match oldest_id {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(
                        "Cannot continue walk of channel {}, oldest message unusable: {}",
                        channel_id,
                        e
                    );
                    messages.extend(page);
                    break WalkStop::MalformedCursor;
                }
            };

            // A page that doesn't reach below the cursor repeats data already seen
            if let Some(previous) = cursor {
                if next_cursor >= previous {
                    tracing::warn!(
                        "Cursor for channel {} did not advance ({} after {}), stopping",
                        channel_id,
                        next_cursor,
                        previous
                    );
                    break WalkStop::CursorStalled;
                }
            }
            cursor = Some(next_cursor);
            messages.extend(page);

            match oldest_instant {
                Ok(instant) if instant < cutoff => {
                    tracing::debug!(
                        "Got till {} which is before {} for channel {}",
                        instant,
                        cutoff,
                        channel_id
                    );
                    break WalkStop::Cutoff;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        "Cannot date oldest message {} in channel {}: {}",
                        next_cursor,
                        channel_id,
                        e
                    );
                }
            }

            if cancel.is_cancelled() {
                break WalkStop::Cancelled;
            }
        };

        tracing::info!(
            "Fetched {} messages from channel {} in {} pages ({:?})",
            messages.len(),
            channel_id,
            pages,
            stop
        );

        HistoryWalk {
            messages,
            stop,
            pages,
        }
    }

    /// Requests one page of messages older than `before` (or the most recent
    /// page when `before` is `None`), after the pacing delay.
    ///
    /// A rate-limited page is not retried.
    pub async fn fetch_page(
        &self,
        channel_id: u64,
        before: Option<u64>,
        cancel: &CancellationToken,
    ) -> PageOutcome {
        let path = format!("channels/{}/messages", channel_id);
        let mut query = vec![("limit", self.page_limit.to_string())];
        if let Some(before) = before {
            query.push(("before", before.to_string()));
        }

        let Some(response) = self.paced_get(&path, &query, cancel).await else {
            return PageOutcome::Cancelled;
        };

        match response {
            Ok(Value::Array(items)) if items.is_empty() => PageOutcome::EndOfHistory,
            Ok(Value::Array(items)) => {
                PageOutcome::Page(items.into_iter().map(RawMessage::new).collect())
            }
            Ok(other) => PageOutcome::Anomaly(TransportAnomaly::malformed(&other)),
            Err(err) => PageOutcome::Anomaly(TransportAnomaly::Failed(err)),
        }
    }

    /// Issues a GET through the shared pacer, raced against `cancel`.
    ///
    /// A rate-limit response with a retry delay is handed to the pacer so
    /// that later requests from any walk wait it out.
    ///
    /// # Returns
    /// - `None` - Cancellation was requested before the response arrived
    /// - `Some(result)` - The transport's answer
    pub async fn paced_get(
        &self,
        path: &str,
        query: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Option<Result<Value, TransportError>> {
        if cancel.is_cancelled() {
            return None;
        }

        let request = async {
            self.pacer.pause().await;
            self.transport.get(path, query).await
        };

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            response = request => response,
        };

        if let Err(TransportError::RateLimited {
            retry_after: Some(delay),
        }) = &response
        {
            self.pacer.defer(*delay);
        }

        Some(response)
    }
}
