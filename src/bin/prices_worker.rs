//! Prices worker: consumes the prices queue and resolves batch quotes.

use anyhow::Context;
use ranked_prices::application::services::pricing::PricingService;
use ranked_prices::config::Settings;
use ranked_prices::infrastructure::messaging::{RpcWorker, connect_with_backoff};
use ranked_prices::infrastructure::upstream::QuoteApi;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env().context("loading settings")?;

    let source = QuoteApi::new(
        settings.prices_api_url.clone(),
        settings.prices_api_key.as_deref(),
        settings.quote_currency.clone(),
        settings.upstream_timeout_ms,
    )
    .context("building price source")?;
    let service = PricingService::new(source);

    let nats = connect_with_backoff(&settings.broker_url, &settings.backoff())
        .await
        .context("connecting to broker")?;

    RpcWorker::new(nats, settings.prices_queue.clone(), service)
        .run()
        .await
        .context("running prices worker")?;
    Ok(())
}
