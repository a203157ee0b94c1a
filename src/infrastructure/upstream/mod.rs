//! # Upstream Infrastructure
//!
//! Clients for the external market-data collaborators:
//!
//! - [`ranking_source`] — paged "top N by 24-hour volume" query
//! - [`price_source`] — batch latest-price query
//!
//! Both collaborators sit behind traits so the worker services can be
//! tested with stub sources.

pub mod error;
pub mod http_client;
pub mod price_source;
pub mod ranking_source;

pub use error::{UpstreamError, UpstreamResult};
pub use http_client::HttpClient;
pub use price_source::{PriceSource, QuoteApi};
pub use ranking_source::{RankingSource, VolumeRankingApi};
