//! HTTP front end: orchestrates the ranking and pricing RPC calls.

use anyhow::Context;
use ranked_prices::api::rest::{AppState, create_router};
use ranked_prices::application::services::orchestrator::RpcOrchestrator;
use ranked_prices::config::Settings;
use ranked_prices::infrastructure::messaging::connect_with_backoff;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env().context("loading settings")?;

    let nats = connect_with_backoff(&settings.broker_url, &settings.backoff())
        .await
        .context("connecting to broker")?;

    let orchestrator = RpcOrchestrator::new(
        nats,
        settings.ranking_queue.clone(),
        settings.prices_queue.clone(),
        settings.rpc_timeout(),
    );
    let state = Arc::new(AppState {
        listing: Arc::new(orchestrator),
    });

    let listener = tokio::net::TcpListener::bind(&settings.http_bind)
        .await
        .with_context(|| format!("binding {}", settings.http_bind))?;
    info!(bind = %settings.http_bind, "api listening");

    axum::serve(listener, create_router(state))
        .await
        .context("serving http")?;
    Ok(())
}
