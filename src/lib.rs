//! # ranked-prices
//!
//! Ranked cryptocurrency price listing composed from two independent
//! backend services over asynchronous request/response messaging.
//!
//! The HTTP front end answers `GET /?limit=N` by issuing two sequential
//! RPC-over-queue calls: the ranking service returns the top `N` symbols
//! by 24-hour volume (fanning out paged upstream calls when `N` exceeds
//! the upstream page size), and the pricing service resolves latest USD
//! prices for that symbol list in one batch. The combined listing is
//! rendered as CSV or JSON.
//!
//! ## Architecture
//!
//! - [`domain`] — value objects (correlation ids, symbols, ranked entries)
//! - [`application`] — pagination planning, worker logic, orchestration
//! - [`infrastructure`] — the RPC-over-queue protocol on NATS and the
//!   upstream HTTP clients
//! - [`api`] — the axum HTTP boundary
//! - [`config`] — environment-driven settings
//!
//! ## RPC protocol
//!
//! Requests are published onto durable well-known queues with two
//! headers: a fresh correlation id and the caller's private reply inbox.
//! Workers consume one request at a time, publish the reply to the inbox
//! tagged with the same correlation id, and acknowledge only after the
//! reply has gone out. Callers suspend on the correlated reply with a
//! configurable timeout; a reply with a foreign, duplicate, or expired
//! correlation id is discarded.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
