//! # Messaging Infrastructure
//!
//! RPC-over-queue protocol on top of NATS.
//!
//! Request/response interactions are built from one-way messages: a
//! client publishes a request envelope onto a durable well-known queue
//! and a worker publishes the reply to the client's private inbox,
//! correlated by an explicit id rather than a transport connection.
//!
//! ## Envelope
//!
//! Every request carries two headers:
//!
//! - [`CORRELATION_ID_HEADER`] — unique per-request token (UUID)
//! - [`REPLY_TO_HEADER`] — the client's private reply address
//!
//! Every reply carries the same correlation id header and is delivered to
//! the reply address.
//!
//! ## Components
//!
//! - [`correlation::CorrelationStore`] — in-flight request tracking
//! - [`rpc_client::RpcClient`] — publish request, await correlated reply
//! - [`rpc_worker::RpcWorker`] — durable consume loop with prefetch = 1
//! - [`connection`] — broker connect with bounded exponential backoff

pub mod connection;
pub mod correlation;
pub mod error;
pub mod rpc_client;
pub mod rpc_worker;

pub use connection::{BackoffConfig, connect_with_backoff};
pub use correlation::{CorrelationStore, PendingReply};
pub use error::{RpcError, RpcResult};
pub use rpc_client::RpcClient;
pub use rpc_worker::{RpcHandler, RpcWorker};

/// Header carrying the unique request/reply correlation token.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

/// Header carrying the requester's private reply address.
pub const REPLY_TO_HEADER: &str = "X-Reply-To";
