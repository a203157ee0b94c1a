//! # Ranked Entry Value Object
//!
//! One row of the final ranked price listing.
//!
//! The serde field names (`Rank`, `Symbol`, `Price USD`) are the wire and
//! presentation names: the price worker publishes replies as a JSON array of
//! these records, and the CSV rendering uses the same names as its header.

use crate::domain::value_objects::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A symbol with its volume rank and latest USD price.
///
/// Ranks are 1-based and assigned by position in the ranking service's
/// output, not derived from the price.
///
/// # Examples
///
/// ```
/// use ranked_prices::domain::value_objects::ranked_entry::RankedEntry;
/// use ranked_prices::domain::value_objects::symbol::Symbol;
///
/// let entry = RankedEntry::new(1, "BTC".parse().unwrap(), 64_000.5);
/// assert!(entry.is_top());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based rank by 24-hour volume.
    #[serde(rename = "Rank")]
    pub rank: u32,
    /// Ticker symbol.
    #[serde(rename = "Symbol")]
    pub symbol: Symbol,
    /// Latest price in USD.
    #[serde(rename = "Price USD")]
    pub price_usd: f64,
}

impl RankedEntry {
    /// Creates a new ranked entry.
    #[must_use]
    pub fn new(rank: u32, symbol: Symbol, price_usd: f64) -> Self {
        Self {
            rank,
            symbol,
            price_usd,
        }
    }

    /// Returns true if this entry holds the top rank.
    #[must_use]
    pub fn is_top(&self) -> bool {
        self.rank == 1
    }
}

impl fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ${}", self.rank, self.symbol, self.price_usd)
    }
}
