//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`CorrelationId`]: UUID-based request/reply correlation token
//!
//! ## Listing Types
//!
//! - [`Symbol`]: validated ticker symbol with comma-list wire helpers
//! - [`RankedEntry`]: one row of the final ranked price listing
//! - [`OutputFormat`]: CSV or JSON rendering selection

pub mod ids;
pub mod output_format;
pub mod ranked_entry;
pub mod symbol;

pub use ids::CorrelationId;
pub use output_format::{OutputFormat, ParseFormatError};
pub use ranked_entry::RankedEntry;
pub use symbol::{Symbol, SymbolError};
