//! # Symbol Value Object
//!
//! Ticker symbol for a cryptocurrency (e.g. `BTC`, `ETH`).
//!
//! Symbols travel between services as comma-joined lists, so the only
//! validation enforced here is that a symbol is non-empty and contains no
//! comma.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an invalid symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// The symbol string was empty.
    #[error("symbol must not be empty")]
    Empty,
    /// The symbol string contained a comma, which is reserved as the
    /// list separator on the wire.
    #[error("symbol must not contain a comma: {0}")]
    ContainsSeparator(String),
}

/// A cryptocurrency ticker symbol.
///
/// # Examples
///
/// ```
/// use ranked_prices::domain::value_objects::symbol::Symbol;
///
/// let btc: Symbol = "BTC".parse().unwrap();
/// assert_eq!(btc.as_str(), "BTC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol, validating it is non-empty and comma-free.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolError`] if the input is empty or contains a comma.
    pub fn new(value: impl Into<String>) -> Result<Self, SymbolError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SymbolError::Empty);
        }
        if value.contains(',') {
            return Err(SymbolError::ContainsSeparator(value));
        }
        Ok(Self(value))
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins symbols into the comma-separated wire form.
    #[must_use]
    pub fn join(symbols: &[Symbol]) -> String {
        symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Splits a comma-separated wire string into symbols.
    ///
    /// Empty segments are dropped, so both `""` and `"BTC,,ETH"` parse
    /// without error.
    #[must_use]
    pub fn split(list: &str) -> Vec<Symbol> {
        list.split(',')
            .filter(|s| !s.is_empty())
            .map(|s| Symbol(s.to_string()))
            .collect()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
