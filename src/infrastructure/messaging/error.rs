//! # Messaging Errors
//!
//! Error types for the RPC-over-queue protocol.
//!
//! This module provides error types for broker connections, request
//! publication, and reply correlation.
//!
//! # Examples
//!
//! ```
//! use ranked_prices::infrastructure::messaging::error::RpcError;
//!
//! let error = RpcError::timeout_with_duration("no reply", 5000);
//! assert!(error.is_retryable());
//!
//! let error = RpcError::malformed("missing correlation id header");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for RPC-over-queue operations.
///
/// Covers the client side (publish, await reply, timeout) and the worker
/// side (consume, reply, acknowledge) of the protocol.
#[derive(Debug, Clone, Error)]
pub enum RpcError {
    /// No matching reply arrived within the configured deadline.
    #[error("rpc timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Deadline in milliseconds, if known.
        timeout_ms: Option<u64>,
    },

    /// Broker connection failed or was lost.
    #[error("rpc connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Publishing a request or reply failed.
    #[error("rpc publish error: {message}")]
    Publish {
        /// Error message.
        message: String,
    },

    /// Subscribing to a queue or reply address failed.
    #[error("rpc subscribe error: {message}")]
    Subscribe {
        /// Error message.
        message: String,
    },

    /// A message violated the envelope contract (missing or invalid
    /// correlation id or reply address, undecodable payload).
    #[error("rpc malformed message: {message}")]
    Malformed {
        /// Error message.
        message: String,
    },

    /// The domain handler failed to produce a reply.
    #[error("rpc handler error: {message}")]
    Handler {
        /// Error message.
        message: String,
    },

    /// The call was abandoned before a reply arrived.
    #[error("rpc call cancelled: {message}")]
    Cancelled {
        /// Error message.
        message: String,
    },
}

impl RpcError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with the deadline that was exceeded.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a publish error.
    #[must_use]
    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish {
            message: message.into(),
        }
    }

    /// Creates a subscribe error.
    #[must_use]
    pub fn subscribe(message: impl Into<String>) -> Self {
        Self::Subscribe {
            message: message.into(),
        }
    }

    /// Creates a malformed message error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a handler error.
    #[must_use]
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
        }
    }

    /// Creates a cancellation error.
    #[must_use]
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }

    /// Returns true if this error is transient and may succeed on retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::Publish { .. }
        )
    }

    /// Returns true if the call timed out waiting for its reply.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns the exceeded deadline in milliseconds, if applicable.
    #[must_use]
    pub fn timeout_ms(&self) -> Option<u64> {
        match self {
            Self::Timeout { timeout_ms, .. } => *timeout_ms,
            _ => None,
        }
    }
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
