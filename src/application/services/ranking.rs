//! # Ranking Service
//!
//! Domain logic behind the ranking queue: given a requested count, fan
//! out paged top-by-volume calls and concatenate the returned symbols in
//! upstream-reported order.
//!
//! A failed page contributes zero symbols and is logged; remaining pages
//! are still fetched (partial-result policy). Only when every page fails
//! and nothing at all was collected does the request fail as a whole.
//! Requests larger than the configured page fan-out bound are clamped,
//! not rejected.

use crate::application::services::pagination::{self, PagePlan};
use crate::domain::value_objects::Symbol;
use crate::infrastructure::messaging::rpc_worker::RpcHandler;
use crate::infrastructure::messaging::{RpcError, RpcResult};
use crate::infrastructure::upstream::ranking_source::RankingSource;
use crate::infrastructure::upstream::{UpstreamError, UpstreamResult};
use bytes::Bytes;
use tracing::{error, warn};

/// Default upper bound on upstream pages per request.
pub const DEFAULT_MAX_PAGES: u32 = 10;

/// Paged fan-out over a [`RankingSource`].
#[derive(Debug)]
pub struct RankingService<S> {
    source: S,
    page_size: u32,
    max_pages: u32,
}

impl<S: RankingSource> RankingService<S> {
    /// Creates a ranking service with the given page size and fan-out
    /// bound.
    #[must_use]
    pub fn new(source: S, page_size: u32, max_pages: u32) -> Self {
        Self {
            source,
            page_size,
            max_pages,
        }
    }

    /// Returns the top `limit` symbols by volume, in rank order.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] only when every page failed and the
    /// result would otherwise be empty for a non-empty request.
    pub async fn ranked_symbols(&self, limit: u32) -> UpstreamResult<Vec<Symbol>> {
        let limit = self.clamp(limit);
        let mut symbols: Vec<Symbol> = Vec::with_capacity(limit as usize);
        let mut last_error: Option<UpstreamError> = None;

        // Sequential by design: one upstream call per planned page.
        for PagePlan {
            page_index,
            count_for_page,
        } in pagination::plan(limit, self.page_size)
        {
            match self.source.top_by_volume(page_index, count_for_page).await {
                Ok(page) => symbols.extend(page),
                Err(upstream_error) => {
                    error!(
                        page = page_index,
                        error = %upstream_error,
                        "failed to fetch ranking page, skipping"
                    );
                    last_error = Some(upstream_error);
                }
            }
        }

        match (symbols.is_empty(), last_error) {
            (true, Some(upstream_error)) => Err(upstream_error),
            _ => Ok(symbols),
        }
    }

    /// Caps the requested count at `max_pages` worth of entries.
    fn clamp(&self, limit: u32) -> u32 {
        let cap = self.max_pages.saturating_mul(self.page_size);
        if limit > cap {
            warn!(limit, cap, "ranking request exceeds page fan-out bound, clamping");
            cap
        } else {
            limit
        }
    }
}

#[async_trait::async_trait]
impl<S: RankingSource> RpcHandler for RankingService<S> {
    async fn handle(&self, payload: &[u8]) -> RpcResult<Bytes> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| RpcError::malformed(format!("ranking payload is not utf-8: {e}")))?;
        let limit: u32 = text
            .trim()
            .parse()
            .map_err(|e| RpcError::malformed(format!("ranking payload {text:?}: {e}")))?;

        let symbols = self
            .ranked_symbols(limit)
            .await
            .map_err(|e| RpcError::handler(format!("ranking produced no result: {e}")))?;
        Ok(Bytes::from(Symbol::join(&symbols)))
    }

    fn name(&self) -> &'static str {
        "ranking"
    }
}
