//! # Pricing Service
//!
//! Domain logic behind the prices queue: given an already-ranked symbol
//! list, fetch the whole batch in one upstream call and zip the input
//! order against the returned prices.
//!
//! Ranks are assigned from the input position (1-based), never from the
//! prices, and a symbol the upstream does not know is omitted from the
//! result without renumbering the survivors.

use crate::domain::value_objects::{RankedEntry, Symbol};
use crate::infrastructure::messaging::rpc_worker::RpcHandler;
use crate::infrastructure::messaging::{RpcError, RpcResult};
use crate::infrastructure::upstream::UpstreamResult;
use crate::infrastructure::upstream::error::UpstreamError;
use crate::infrastructure::upstream::price_source::PriceSource;
use bytes::Bytes;
use tracing::error;

/// Batch price resolution over a [`PriceSource`].
#[derive(Debug)]
pub struct PricingService<S> {
    source: S,
}

impl<S: PriceSource> PricingService<S> {
    /// Creates a pricing service.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Resolves prices for `symbols`, preserving their rank order.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the batch lookup itself fails.
    /// Individually missing symbols are logged and omitted, not errors.
    pub async fn ranked_prices(&self, symbols: &[Symbol]) -> UpstreamResult<Vec<RankedEntry>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let prices = self.source.latest_prices(symbols).await?;

        let entries = symbols
            .iter()
            .enumerate()
            .filter_map(|(position, symbol)| {
                let rank = position as u32 + 1;
                match prices.get(symbol) {
                    Some(price) => Some(RankedEntry::new(rank, symbol.clone(), *price)),
                    None => {
                        let missing = UpstreamError::unknown_symbol(symbol.as_str());
                        error!(rank, error = %missing, "symbol missing from price response, omitting");
                        None
                    }
                }
            })
            .collect();
        Ok(entries)
    }
}

#[async_trait::async_trait]
impl<S: PriceSource> RpcHandler for PricingService<S> {
    async fn handle(&self, payload: &[u8]) -> RpcResult<Bytes> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| RpcError::malformed(format!("prices payload is not utf-8: {e}")))?;
        let symbols = Symbol::split(text);

        let entries = self
            .ranked_prices(&symbols)
            .await
            .map_err(|e| RpcError::handler(format!("price lookup failed: {e}")))?;
        let body = serde_json::to_vec(&entries)
            .map_err(|e| RpcError::handler(format!("encoding price reply: {e}")))?;
        Ok(Bytes::from(body))
    }

    fn name(&self) -> &'static str {
        "prices"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Stub source serving a fixed symbol → price map.
    struct StubSource {
        prices: HashMap<Symbol, f64>,
        fail: bool,
    }

    impl StubSource {
        fn with_prices(prices: &[(&str, f64)]) -> Self {
            Self {
                prices: prices
                    .iter()
                    .map(|(s, p)| (Symbol::new(*s).unwrap(), *p))
                    .collect(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                prices: HashMap::new(),
                fail: true,
            }
        }
    }

    #[async_trait::async_trait]
    impl PriceSource for StubSource {
        async fn latest_prices(
            &self,
            _symbols: &[Symbol],
        ) -> UpstreamResult<HashMap<Symbol, f64>> {
            if self.fail {
                return Err(UpstreamError::unavailable_with_status("boom", 503));
            }
            Ok(self.prices.clone())
        }
    }

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|n| Symbol::new(*n).unwrap()).collect()
    }

    #[tokio::test]
    async fn preserves_input_rank_order() {
        let service = PricingService::new(StubSource::with_prices(&[
            ("BTC", 64000.5),
            ("ETH", 3100.25),
            ("XRP", 0.52),
        ]));

        let entries = service
            .ranked_prices(&symbols(&["BTC", "ETH", "XRP"]))
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].symbol.as_str(), "BTC");
        assert_eq!(entries[2].rank, 3);
        assert_eq!(entries[2].symbol.as_str(), "XRP");
    }

    #[tokio::test]
    async fn missing_symbol_is_omitted_without_renumbering() {
        let service = PricingService::new(StubSource::with_prices(&[
            ("BTC", 64000.5),
            ("XRP", 0.52),
        ]));

        let entries = service
            .ranked_prices(&symbols(&["BTC", "ETH", "XRP"]))
            .await
            .unwrap();
        // ETH is gone, XRP keeps its original rank 3.
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].symbol.as_str(), "BTC");
        assert_eq!(entries[1].rank, 3);
        assert_eq!(entries[1].symbol.as_str(), "XRP");
    }

    #[tokio::test]
    async fn all_symbols_missing_is_an_empty_success() {
        let service = PricingService::new(StubSource::with_prices(&[]));
        let entries = service.ranked_prices(&symbols(&["BTC"])).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn empty_input_skips_upstream() {
        let service = PricingService::new(StubSource::failing());
        // No symbols means no upstream call, so the failing source is
        // never consulted.
        assert!(service.ranked_prices(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_lookup_is_a_hard_failure() {
        let service = PricingService::new(StubSource::failing());
        assert!(service.ranked_prices(&symbols(&["BTC"])).await.is_err());
    }

    #[tokio::test]
    async fn handler_emits_json_with_presentation_keys() {
        let service = PricingService::new(StubSource::with_prices(&[("BTC", 1.5)]));

        let reply = service.handle(b"BTC").await.unwrap();
        let parsed: Vec<RankedEntry> = serde_json::from_slice(&reply).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].rank, 1);

        let raw: serde_json::Value = serde_json::from_slice(&reply).unwrap();
        assert!(raw[0].get("Price USD").is_some());
    }

    #[tokio::test]
    async fn handler_accepts_empty_payload() {
        let service = PricingService::new(StubSource::failing());
        let reply = service.handle(b"").await.unwrap();
        assert_eq!(reply, Bytes::from_static(b"[]"));
    }
}
