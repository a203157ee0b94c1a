//! # Identifier Value Objects
//!
//! Identity types for the RPC protocol.
//!
//! This module provides [`CorrelationId`], the unique token that ties an
//! asynchronous reply back to the request that caused it.
//!
//! # Examples
//!
//! ```
//! use ranked_prices::domain::value_objects::ids::CorrelationId;
//!
//! let a = CorrelationId::new_v4();
//! let b = CorrelationId::new_v4();
//!
//! assert_ne!(a, b);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for one logical request/reply pair.
///
/// Generated once per outbound RPC call and never reused. A reply is
/// accepted only by the client that issued the request carrying the same
/// correlation id; anything else is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generates a fresh random (v4) correlation id.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a correlation id from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CorrelationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_v4_is_unique() {
        let a = CorrelationId::new_v4();
        let b = CorrelationId::new_v4();
        assert_ne!(a, b);
    }

    #[test]
    fn round_trips_through_string() {
        let id = CorrelationId::new_v4();
        let parsed: CorrelationId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("not-a-uuid".parse::<CorrelationId>().is_err());
    }

    #[test]
    fn serde_transparent() {
        let id = CorrelationId::new_v4();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
