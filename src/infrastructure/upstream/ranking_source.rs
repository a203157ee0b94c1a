//! # Ranking Source
//!
//! Upstream "top N by 24-hour volume" query, paged.
//!
//! The upstream enforces a maximum page size, so the ranking worker calls
//! [`RankingSource::top_by_volume`] once per planned page and concatenates
//! the results in upstream-reported order.

use crate::domain::value_objects::Symbol;
use crate::infrastructure::upstream::error::{UpstreamError, UpstreamResult};
use crate::infrastructure::upstream::http_client::HttpClient;
use serde::Deserialize;
use tracing::warn;

/// Source of volume-ranked symbols.
#[async_trait::async_trait]
pub trait RankingSource: Send + Sync {
    /// Returns up to `limit` symbols for `page` (0-based), ordered by
    /// descending 24-hour volume.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the page cannot be fetched; the
    /// caller treats a failed page as contributing zero symbols.
    async fn top_by_volume(&self, page: u32, limit: u32) -> UpstreamResult<Vec<Symbol>>;
}

/// Top-by-volume endpoint response.
#[derive(Debug, Deserialize)]
struct TopVolumeResponse {
    #[serde(rename = "Data", default)]
    data: Vec<TopVolumeCoin>,
}

#[derive(Debug, Deserialize)]
struct TopVolumeCoin {
    #[serde(rename = "CoinInfo")]
    coin_info: CoinInfo,
}

#[derive(Debug, Deserialize)]
struct CoinInfo {
    #[serde(rename = "Name")]
    name: String,
}

/// HTTP implementation of [`RankingSource`].
#[derive(Debug, Clone)]
pub struct VolumeRankingApi {
    http: HttpClient,
    base_url: String,
    quote_currency: String,
}

impl VolumeRankingApi {
    /// Creates a client for the top-by-volume endpoint.
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
            let value = reqwest::header::HeaderValue::from_str(&format!("Apikey {key}"))
                .map_err(|e| UpstreamError::connection(format!("invalid api key: {e}")))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        Ok(Self {
            http: HttpClient::with_headers(timeout_ms, headers)?,
            base_url: base_url.into(),
            quote_currency: quote_currency.into(),
        })
    }
}

#[async_trait::async_trait]
impl RankingSource for VolumeRankingApi {
    async fn top_by_volume(&self, page: u32, limit: u32) -> UpstreamResult<Vec<Symbol>> {
        let params = [
            ("page", page.to_string()),
            ("limit", limit.to_string()),
            ("tsym", self.quote_currency.clone()),
        ];
        let response: TopVolumeResponse = self.http.get_with_params(&self.base_url, &params).await?;

        let symbols = response
            .data
            .into_iter()
            .filter_map(|coin| match Symbol::new(coin.coin_info.name) {
                Ok(symbol) => Some(symbol),
                Err(error) => {
                    warn!(%error, "skipping unusable symbol in ranking response");
                    None
                }
            })
            .collect();
        Ok(symbols)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page_body(names: &[&str]) -> serde_json::Value {
        serde_json::json!({
            "Data": names
                .iter()
                .map(|n| serde_json::json!({ "CoinInfo": { "Name": n } }))
                .collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn fetches_symbols_in_upstream_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("page", "0"))
            .and(query_param("limit", "3"))
            .and(query_param("tsym", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[
                "BTC", "ETH", "XRP",
            ])))
            .mount(&server)
            .await;

        let api = VolumeRankingApi::new(server.uri(), None, "USD", 5000).unwrap();
        let symbols = api.top_by_volume(0, 3).await.unwrap();
        assert_eq!(symbols.len(), 3);
        assert_eq!(symbols[0].as_str(), "BTC");
        assert_eq!(symbols[2].as_str(), "XRP");
    }

    #[tokio::test]
    async fn sends_api_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Apikey secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["BTC"])))
            .expect(1)
            .mount(&server)
            .await;

        let api = VolumeRankingApi::new(server.uri(), Some("secret"), "USD", 5000).unwrap();
        let symbols = api.top_by_volume(0, 1).await.unwrap();
        assert_eq!(symbols.len(), 1);
    }

    #[tokio::test]
    async fn failed_page_surfaces_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = VolumeRankingApi::new(server.uri(), None, "USD", 5000).unwrap();
        let error = api.top_by_volume(0, 10).await.unwrap_err();
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn empty_data_is_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let api = VolumeRankingApi::new(server.uri(), None, "USD", 5000).unwrap();
        assert!(api.top_by_volume(0, 10).await.unwrap().is_empty());
    }
}
