//! # Configuration
//!
//! Environment-driven settings shared by the three processes.
//!
//! Every field has a sensible default so a local run against a default
//! NATS broker needs no configuration at all. Values are read from
//! `RANKED_PRICES_*` environment variables (e.g.
//! `RANKED_PRICES_BROKER_URL`, `RANKED_PRICES_RPC_TIMEOUT_MS`).
//!
//! # Examples
//!
//! ```
//! use ranked_prices::config::Settings;
//!
//! let settings = Settings::default();
//! assert_eq!(settings.ranking_queue, "ranking_queue");
//! assert_eq!(settings.page_size, 100);
//! ```

use crate::infrastructure::messaging::BackoffConfig;
use serde::Deserialize;
use std::time::Duration;

/// Default broker URL.
const DEFAULT_BROKER_URL: &str = "nats://localhost:4222";

/// Default RPC reply deadline in milliseconds.
const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000;

/// Default HTTP bind address.
const DEFAULT_HTTP_BIND: &str = "0.0.0.0:6667";

/// Default upstream page size.
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default upper bound on upstream pages per ranking request.
const DEFAULT_MAX_PAGES: u32 = 10;

/// Default upstream HTTP timeout in milliseconds.
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 5_000;

/// Default quote currency.
const DEFAULT_QUOTE_CURRENCY: &str = "USD";

/// Default top-by-volume endpoint.
const DEFAULT_RANKING_API_URL: &str = "https://min-api.cryptocompare.com/data/top/totalvolfull";

/// Default batch quote endpoint.
const DEFAULT_PRICES_API_URL: &str =
    "https://pro-api.coinmarketcap.com/v1/cryptocurrency/quotes/latest";

/// Process settings, loaded from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Broker URL.
    #[serde(default = "default_broker_url")]
    pub broker_url: String,
    /// Well-known queue for ranking requests.
    #[serde(default = "default_ranking_queue")]
    pub ranking_queue: String,
    /// Well-known queue for price requests.
    #[serde(default = "default_prices_queue")]
    pub prices_queue: String,
    /// Client-side reply deadline in milliseconds.
    #[serde(default = "default_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
    /// Bind address for the HTTP front end.
    #[serde(default = "default_http_bind")]
    pub http_bind: String,
    /// Upstream ranking page size.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upper bound on upstream pages per ranking request.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Upstream HTTP timeout in milliseconds.
    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,
    /// Quote currency for both upstreams.
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,
    /// Top-by-volume endpoint URL.
    #[serde(default = "default_ranking_api_url")]
    pub ranking_api_url: String,
    /// API key for the ranking source, if required.
    #[serde(default)]
    pub ranking_api_key: Option<String>,
    /// Batch quote endpoint URL.
    #[serde(default = "default_prices_api_url")]
    pub prices_api_url: String,
    /// API key for the price source, if required.
    #[serde(default)]
    pub prices_api_key: Option<String>,
}

fn default_broker_url() -> String {
    DEFAULT_BROKER_URL.to_string()
}

fn default_ranking_queue() -> String {
    "ranking_queue".to_string()
}

fn default_prices_queue() -> String {
    "prices_queue".to_string()
}

fn default_rpc_timeout_ms() -> u64 {
    DEFAULT_RPC_TIMEOUT_MS
}

fn default_http_bind() -> String {
    DEFAULT_HTTP_BIND.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_upstream_timeout_ms() -> u64 {
    DEFAULT_UPSTREAM_TIMEOUT_MS
}

fn default_quote_currency() -> String {
    DEFAULT_QUOTE_CURRENCY.to_string()
}

fn default_ranking_api_url() -> String {
    DEFAULT_RANKING_API_URL.to_string()
}

fn default_prices_api_url() -> String {
    DEFAULT_PRICES_API_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            broker_url: default_broker_url(),
            ranking_queue: default_ranking_queue(),
            prices_queue: default_prices_queue(),
            rpc_timeout_ms: default_rpc_timeout_ms(),
            http_bind: default_http_bind(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
            quote_currency: default_quote_currency(),
            ranking_api_url: default_ranking_api_url(),
            ranking_api_key: None,
            prices_api_url: default_prices_api_url(),
            prices_api_key: None,
        }
    }
}

impl Settings {
    /// Loads settings from `RANKED_PRICES_*` environment variables,
    /// falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`config::ConfigError`] if a provided value cannot be
    /// parsed into its field type.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("RANKED_PRICES"))
            .build()?
            .try_deserialize()
    }

    /// Returns the RPC reply deadline as a duration.
    #[must_use]
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    /// Returns the broker connection retry policy.
    #[must_use]
    pub fn backoff(&self) -> BackoffConfig {
        BackoffConfig::default()
    }
}
