//! Ranking worker: consumes the ranking queue and fans out paged
//! top-by-volume upstream calls.

use anyhow::Context;
use ranked_prices::application::services::ranking::RankingService;
use ranked_prices::config::Settings;
use ranked_prices::infrastructure::messaging::{RpcWorker, connect_with_backoff};
use ranked_prices::infrastructure::upstream::VolumeRankingApi;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env().context("loading settings")?;

    let source = VolumeRankingApi::new(
        settings.ranking_api_url.clone(),
        settings.ranking_api_key.as_deref(),
        settings.quote_currency.clone(),
        settings.upstream_timeout_ms,
    )
    .context("building ranking source")?;
    let service = RankingService::new(source, settings.page_size, settings.max_pages);

    let nats = connect_with_backoff(&settings.broker_url, &settings.backoff())
        .await
        .context("connecting to broker")?;

    RpcWorker::new(nats, settings.ranking_queue.clone(), service)
        .run()
        .await
        .context("running ranking worker")?;
    Ok(())
}
