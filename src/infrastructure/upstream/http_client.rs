//! # HTTP Client Utilities
//!
//! Shared HTTP client wrapper for the upstream market-data sources.
//!
//! Provides configurable timeouts, default headers (for API keys), JSON
//! deserialization, and status-code to error mapping.
//!
//! # Examples
//!
//! ```ignore
//! use ranked_prices::infrastructure::upstream::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let response: MyResponse = client
//!     .get_with_params("https://api.example.com/top", &[("limit", "100")])
//!     .await?;
//! ```

use crate::infrastructure::upstream::error::{UpstreamError, UpstreamResult};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for upstream data sources.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Connection`] if the client cannot be built.
    pub fn new(timeout_ms: u64) -> UpstreamResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| UpstreamError::connection(format!("failed to build http client: {e}")))?;

        Ok(Self { client, timeout_ms })
    }

    /// Creates a new HTTP client with default headers included in every
    /// request (API key, accept type).
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Connection`] if the client cannot be built.
    pub fn with_headers(
        timeout_ms: u64,
        default_headers: reqwest::header::HeaderMap,
    ) -> UpstreamResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(default_headers)
            .build()
            .map_err(|e| UpstreamError::connection(format!("failed to build http client: {e}")))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request with query parameters and deserializes the JSON
    /// response.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Connection`] or [`UpstreamError::Timeout`]
    /// if the request fails, [`UpstreamError::Unavailable`] for non-success
    /// statuses, and [`UpstreamError::Protocol`] if the body cannot be
    /// parsed.
    pub async fn get_with_params<T: DeserializeOwned, P: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> UpstreamResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Handles the HTTP response, checking status and deserializing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> UpstreamResult<T> {
        let status = response.status();

        if status.is_success() {
            response.json::<T>().await.map_err(|e| {
                UpstreamError::protocol(format!("failed to parse response body: {e}"))
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Self::map_status_error(status, &body))
        }
    }

    /// Maps a reqwest error to an upstream error.
    fn map_reqwest_error(&self, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::timeout(format!("request exceeded {}ms", self.timeout_ms))
        } else {
            UpstreamError::connection(format!("http request failed: {error}"))
        }
    }

    /// Maps an HTTP status code to an upstream error.
    fn map_status_error(status: StatusCode, body: &str) -> UpstreamError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                UpstreamError::authentication(format!("authentication failed: {body}"))
            }
            StatusCode::TOO_MANY_REQUESTS => UpstreamError::rate_limited("rate limit exceeded"),
            _ => UpstreamError::unavailable_with_status(
                format!("http error ({status}): {body}"),
                status.as_u16(),
            ),
        }
    }
}
