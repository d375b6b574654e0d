use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    error::AppError,
    service::{ChannelEnumerator, HistoryPaginator, MessageNormalizer},
    transport::{DiscordTransport, HttpTransport, Pacer},
};

/// Builds the HTTP client used for all Discord API requests.
///
/// Redirects are disabled so the credential is never forwarded to another
/// host. A request timeout keeps a stalled connection from hanging a walk.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("discord-history/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(client)
}

/// Creates the transport from configuration.
pub fn setup_transport(config: &Config) -> Result<Arc<dyn DiscordTransport>, AppError> {
    let client = setup_reqwest_client()?;

    Ok(Arc::new(HttpTransport::new(
        client,
        config.api_base.clone(),
        config.credential.clone(),
    )))
}

/// Wires paginator, normalizer and enumerator around a shared transport.
///
/// # Arguments
/// - `config` - Pacing, concurrency and normalizer settings
/// - `transport` - Transport shared by every walk
/// - `cancel` - Token that aborts in-flight walks between pages
pub fn setup_enumerator(
    config: &Config,
    transport: Arc<dyn DiscordTransport>,
    cancel: CancellationToken,
) -> ChannelEnumerator {
    let pacer = Arc::new(Pacer::new(config.pacing_min, config.pacing_max));
    let paginator = HistoryPaginator::new(transport, pacer);

    ChannelEnumerator::new(paginator, MessageNormalizer::new(config.normalize))
        .with_concurrency(config.concurrency)
        .with_cancellation(cancel)
}
