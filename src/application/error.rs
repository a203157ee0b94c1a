//! # Application Errors
//!
//! Error taxonomy for the request orchestration layer.
//!
//! Protocol-level failures (timeout, malformed correlation) fail closed
//! with an explicit error; unsupported request parameters are surfaced as
//! structured errors the HTTP boundary maps to status codes. Partial
//! upstream failures never reach this layer — they are recovered inside
//! the workers and degrade the result to a shorter listing.
//!
//! # Examples
//!
//! ```
//! use ranked_prices::application::error::ApplicationError;
//! use ranked_prices::infrastructure::messaging::RpcError;
//!
//! let err: ApplicationError = RpcError::timeout("no reply").into();
//! assert!(err.is_timeout());
//!
//! let err = ApplicationError::unsupported_datetime("2021-01-01");
//! assert!(!err.is_timeout());
//! ```

use crate::infrastructure::messaging::RpcError;
use crate::infrastructure::upstream::UpstreamError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// RPC protocol failure (timeout, broker, correlation).
    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),

    /// Upstream data source failure that left zero results.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// A reply payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Historical data was requested; only `NOW` is supported.
    #[error("unsupported datetime: {0} (only NOW is supported)")]
    UnsupportedDatetime(String),

    /// The requested output format is not CSV or JSON.
    #[error("invalid format: {0} (expected CSV or JSON)")]
    InvalidFormat(String),
}

impl ApplicationError {
    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an unsupported datetime error.
    #[must_use]
    pub fn unsupported_datetime(value: impl Into<String>) -> Self {
        Self::UnsupportedDatetime(value.into())
    }

    /// Creates an invalid format error.
    #[must_use]
    pub fn invalid_format(value: impl Into<String>) -> Self {
        Self::InvalidFormat(value.into())
    }

    /// Returns true if this is an RPC timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Rpc(rpc) if rpc.is_timeout())
    }

    /// Returns true if this error is transient and may succeed on retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Rpc(rpc) => rpc.is_retryable(),
            Self::Upstream(upstream) => upstream.is_retryable(),
            _ => false,
        }
    }

    /// Returns true if the request itself was unsupported or invalid.
    #[must_use]
    pub fn is_unsupported_request(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedDatetime(_) | Self::InvalidFormat(_) | Self::Validation(_)
        )
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_timeout_is_timeout() {
        let err: ApplicationError = RpcError::timeout_with_duration("no reply", 5000).into();
        assert!(err.is_timeout());
        assert!(err.is_retryable());
    }

    #[test]
    fn upstream_error_is_retryable() {
        let err: ApplicationError = UpstreamError::unavailable("server error").into();
        assert!(err.is_retryable());
        assert!(!err.is_timeout());
    }

    #[test]
    fn unsupported_datetime() {
        let err = ApplicationError::unsupported_datetime("2021-01-01T00:00:00Z");
        assert!(err.is_unsupported_request());
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("2021-01-01"));
    }

    #[test]
    fn invalid_format() {
        let err = ApplicationError::invalid_format("XML");
        assert!(err.is_unsupported_request());
        assert!(err.to_string().contains("XML"));
    }

    #[test]
    fn decode_is_not_retryable() {
        assert!(!ApplicationError::decode("bad json").is_retryable());
    }
}
