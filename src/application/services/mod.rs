//! # Application Services
//!
//! Use-case logic for the ranked price listing:
//!
//! - [`pagination`] — pure fan-out planning for the paged ranking source
//! - [`ranking`] — ranking worker behavior (paged fan-out, partial results)
//! - [`pricing`] — price worker behavior (batch zip, omission on miss)
//! - [`orchestrator`] — sequential ranking-then-pricing composition

pub mod orchestrator;
pub mod pagination;
pub mod pricing;
pub mod ranking;

pub use orchestrator::{RankedPriceService, RpcOrchestrator};
pub use pagination::{DEFAULT_PAGE_SIZE, PagePlan};
pub use pricing::PricingService;
pub use ranking::{DEFAULT_MAX_PAGES, RankingService};
