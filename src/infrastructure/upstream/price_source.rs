//! # Price Source
//!
//! Upstream batch quote query: one call resolves the latest price for a
//! whole list of symbols.
//!
//! The response maps symbols to quote objects keyed by quote currency; a
//! requested symbol may be absent from the mapping, which the price
//! worker recovers from by omission.

use crate::domain::value_objects::Symbol;
use crate::infrastructure::upstream::error::{UpstreamError, UpstreamResult};
use crate::infrastructure::upstream::http_client::HttpClient;
use serde::Deserialize;
use std::collections::HashMap;

/// Header carrying the price API key.
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Source of latest batch prices.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    /// Returns the latest price per symbol for the given batch.
    ///
    /// Symbols the upstream does not know are simply absent from the
    /// returned map.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the batch lookup itself fails.
    async fn latest_prices(&self, symbols: &[Symbol]) -> UpstreamResult<HashMap<Symbol, f64>>;
}

/// Batch quote endpoint response.
#[derive(Debug, Deserialize)]
struct QuotesResponse {
    #[serde(default)]
    data: HashMap<String, QuotedSymbol>,
}

#[derive(Debug, Deserialize)]
struct QuotedSymbol {
    quote: HashMap<String, QuotePrice>,
}

#[derive(Debug, Deserialize)]
struct QuotePrice {
    price: f64,
}

/// HTTP implementation of [`PriceSource`].
#[derive(Debug, Clone)]
pub struct QuoteApi {
    http: HttpClient,
    base_url: String,
    quote_currency: String,
}

impl QuoteApi {
    /// Creates a client for the batch quote endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Connection`] if the HTTP client cannot be
    /// built (e.g. an invalid API key value).
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        quote_currency: impl Into<String>,
        timeout_ms: u64,
    ) -> UpstreamResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("accept", reqwest::header::HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let value = reqwest::header::HeaderValue::from_str(key)
                .map_err(|e| UpstreamError::connection(format!("invalid api key: {e}")))?;
            headers.insert(API_KEY_HEADER, value);
        }

        Ok(Self {
            http: HttpClient::with_headers(timeout_ms, headers)?,
            base_url: base_url.into(),
            quote_currency: quote_currency.into(),
        })
    }
}

#[async_trait::async_trait]
impl PriceSource for QuoteApi {
    async fn latest_prices(&self, symbols: &[Symbol]) -> UpstreamResult<HashMap<Symbol, f64>> {
        let params = [
            ("symbol", Symbol::join(symbols)),
            ("convert", self.quote_currency.clone()),
        ];
        let response: QuotesResponse = self.http.get_with_params(&self.base_url, &params).await?;

        let mut prices = HashMap::with_capacity(response.data.len());
        for (name, quoted) in response.data {
            let Some(quote) = quoted.quote.get(&self.quote_currency) else {
                continue;
            };
            if let Ok(symbol) = Symbol::new(name) {
                prices.insert(symbol, quote.price);
            }
        }
        Ok(prices)
    }
}
