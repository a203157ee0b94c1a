//! # Upstream Errors
//!
//! Error types for the upstream market-data APIs.
//!
//! A failed upstream call is recovered locally wherever possible: a failed
//! ranking page contributes zero symbols, and a symbol missing from a
//! price response is omitted from the final listing. These errors are
//! logged at the point of recovery and only surface to the caller when
//! they leave zero results.
//!
//! # Examples
//!
//! ```
//! use ranked_prices::infrastructure::upstream::error::UpstreamError;
//!
//! let error = UpstreamError::unavailable_with_status("server error", 503);
//! assert!(error.is_retryable());
//!
//! let error = UpstreamError::unknown_symbol("DOGE");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for upstream HTTP data sources.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// The upstream returned a non-success status.
    #[error("upstream unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
        /// HTTP status code, if one was received.
        status: Option<u16>,
    },

    /// The request never reached the upstream.
    #[error("upstream connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// The upstream did not answer in time.
    #[error("upstream timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// The API key was missing or rejected.
    #[error("upstream authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// The upstream throttled the request.
    #[error("upstream rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("upstream protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// A requested symbol was absent from the upstream response.
    #[error("unknown symbol: {symbol}")]
    UnknownSymbol {
        /// The missing symbol.
        symbol: String,
    },
}

impl UpstreamError {
    /// Creates an unavailable error without a status code.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            status: None,
        }
    }

    /// Creates an unavailable error from an HTTP status.
    #[must_use]
    pub fn unavailable_with_status(message: impl Into<String>, status: u16) -> Self {
        Self::Unavailable {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an unknown symbol error.
    #[must_use]
    pub fn unknown_symbol(symbol: impl Into<String>) -> Self {
        Self::UnknownSymbol {
            symbol: symbol.into(),
        }
    }

    /// Returns true if this error is transient and may succeed on retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. }
                | Self::Connection { .. }
                | Self::Timeout { .. }
                | Self::RateLimited { .. }
        )
    }

    /// Returns the HTTP status code, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unavailable { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_is_retryable() {
        let error = UpstreamError::unavailable_with_status("server error", 503);
        assert!(error.is_retryable());
        assert_eq!(error.status(), Some(503));
    }

    #[test]
    fn protocol_is_not_retryable() {
        let error = UpstreamError::protocol("unexpected body");
        assert!(!error.is_retryable());
        assert_eq!(error.status(), None);
    }

    #[test]
    fn unknown_symbol_is_not_retryable() {
        let error = UpstreamError::unknown_symbol("DOGE");
        assert!(!error.is_retryable());
        assert!(error.to_string().contains("DOGE"));
    }

    #[test]
    fn timeout_is_retryable() {
        assert!(UpstreamError::timeout("5s exceeded").is_retryable());
    }
}
