use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use test_utils::factory::{
    create_category, create_dm_channel, create_history, create_text_channel,
    create_voice_channel, MessageFactory,
};
use tokio_util::sync::CancellationToken;

use crate::{
    model::{RawMessage, TimeWindow},
    service::{
        ChannelEnumerator, HistoryPaginator, MessageNormalizer, NormalizeOptions, WalkStop,
    },
    transport::{
        mock::{MockReply, MockTransport},
        Pacer,
    },
    util::clock::fixed_clock,
};


/// Fixed "now" shared by all service tests: 2024-01-01T12:00:00Z.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Paginator over `transport` with pacing disabled and the clock pinned to `now()`.
fn paginator(transport: Arc<MockTransport>) -> HistoryPaginator {
    HistoryPaginator::new(transport, Arc::new(Pacer::disabled())).with_clock(fixed_clock(now()))
}

/// Enumerator with default normalizer options over `transport`.
fn enumerator(transport: Arc<MockTransport>) -> ChannelEnumerator {
    ChannelEnumerator::new(paginator(transport), MessageNormalizer::default())
}
