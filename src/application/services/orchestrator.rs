//! # Orchestrator
//!
//! Sequential composition of the two RPC calls behind the HTTP endpoint:
//! ranking first, then pricing, with the ranking reply fed verbatim into
//! the price request.
//!
//! The composition sits behind [`RankedPriceService`] so the HTTP
//! handlers can be tested with a stub instead of a live broker.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::value_objects::RankedEntry;
use crate::infrastructure::messaging::rpc_client::RpcClient;
use async_nats::Client;
use bytes::Bytes;
use std::time::Duration;
use tracing::debug;

/// Produces the ranked price listing for a requested count.
#[async_trait::async_trait]
pub trait RankedPriceService: Send + Sync {
    /// Returns the top `limit` entries, ranked by volume, with latest
    /// USD prices.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError`] on protocol failure (including
    /// [`crate::infrastructure::messaging::RpcError::Timeout`]) or an
    /// undecodable reply.
    async fn ranked_prices(&self, limit: u32) -> ApplicationResult<Vec<RankedEntry>>;
}

/// RPC-backed implementation composing the ranking and prices queues.
///
/// Each call builds two fresh [`RpcClient`]s, one per backend, so
/// concurrent HTTP requests are isolated: every in-flight call owns its
/// own private reply address and replies cannot cross-match.
#[derive(Debug, Clone)]
pub struct RpcOrchestrator {
    nats: Client,
    ranking_queue: String,
    prices_queue: String,
    timeout: Duration,
}

impl RpcOrchestrator {
    /// Creates an orchestrator over an established broker connection.
    #[must_use]
    pub fn new(
        nats: Client,
        ranking_queue: impl Into<String>,
        prices_queue: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            nats,
            ranking_queue: ranking_queue.into(),
            prices_queue: prices_queue.into(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl RankedPriceService for RpcOrchestrator {
    async fn ranked_prices(&self, limit: u32) -> ApplicationResult<Vec<RankedEntry>> {
        // Strictly sequential: pricing depends on the ranking output.
        let mut ranking =
            RpcClient::new(self.nats.clone(), self.ranking_queue.clone(), self.timeout).await?;
        let ranked = ranking.call(Bytes::from(limit.to_string())).await?;
        debug!(limit, bytes = ranked.len(), "ranking reply received");

        let mut prices =
            RpcClient::new(self.nats.clone(), self.prices_queue.clone(), self.timeout).await?;
        let reply = prices.call(ranked).await?;

        serde_json::from_slice(&reply)
            .map_err(|e| ApplicationError::decode(format!("price reply is not valid json: {e}")))
    }
}
