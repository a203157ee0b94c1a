//! # REST API
//!
//! HTTP boundary for the ranked price listing.
//!
//! # Endpoints
//!
//! - `GET /` - Ranked prices of the top N cryptocurrencies.
//!   Query parameters: `limit` (required, ≥ 1), `datetime` (default
//!   `NOW`, anything else is 501), `format` (`CSV` default or `JSON`,
//!   anything else is 403).
//! - `GET /health` - Health check endpoint.
//!
//! # Usage
//!
//! ```ignore
//! use ranked_prices::api::rest::{AppState, create_router};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState { listing: /* RpcOrchestrator */ });
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:6667").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, ErrorResponse, HealthResponse, ListingParams, render_csv};
pub use routes::create_router;
