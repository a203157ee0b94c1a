//! # Output Format Value Object
//!
//! Rendering format requested through the HTTP boundary.
//!
//! Only `CSV` (the default) and `JSON` are accepted; any other value is an
//! invalid-format request and is rejected at the API layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an unrecognized output format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid format: {0} (expected CSV or JSON)")]
pub struct ParseFormatError(pub String);

/// Output rendering format for the ranked price listing.
///
/// # Examples
///
/// ```
/// use ranked_prices::domain::value_objects::output_format::OutputFormat;
///
/// assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
/// assert_eq!(OutputFormat::default(), OutputFormat::Csv);
/// assert!("XML".parse::<OutputFormat>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    /// Comma-separated values with a `Rank,Symbol,Price USD` header.
    #[default]
    Csv,
    /// JSON array of ranked entry objects.
    Json,
}

impl OutputFormat {
    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
        }
    }

    /// Returns the media type for HTTP responses.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Json => "application/json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CSV" => Ok(Self::Csv),
            "JSON" => Ok(Self::Json),
            other => Err(ParseFormatError(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_names() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    }

    #[test]
    fn rejects_other_values() {
        assert!("csv".parse::<OutputFormat>().is_err());
        assert!("XML".parse::<OutputFormat>().is_err());
        assert!("".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn default_is_csv() {
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
    }

    #[test]
    fn content_types() {
        assert!(OutputFormat::Csv.content_type().starts_with("text/csv"));
        assert_eq!(OutputFormat::Json.content_type(), "application/json");
    }
}
