//! # REST Handlers
//!
//! Request handlers for the ranked price listing endpoint.
//!
//! The listing handler validates the query parameters, invokes the
//! orchestrated RPC composition through [`RankedPriceService`], and
//! renders the result as CSV (default) or JSON. Unsupported parameters
//! fail closed with structured error responses instead of being ignored.

use crate::application::error::ApplicationError;
use crate::application::services::orchestrator::RankedPriceService;
use crate::domain::value_objects::{OutputFormat, RankedEntry};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// The only supported value of the `datetime` parameter.
const DATETIME_NOW: &str = "NOW";

/// Shared state for the REST API.
pub struct AppState {
    /// The orchestrated ranking + pricing composition.
    pub listing: Arc<dyn RankedPriceService>,
}

/// Query parameters for the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListingParams {
    /// Number of top cryptocurrencies to return. Required, must be ≥ 1.
    pub limit: u32,
    /// Timestamp of the returned information; only `NOW` is supported.
    pub datetime: Option<String>,
    /// Output format, `CSV` (default) or `JSON`.
    pub format: Option<String>,
}

/// Structured error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error response body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status, always `ok` when reachable.
    pub status: String,
}

/// `GET /health` — liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// `GET /` — returns ranked prices of the top N cryptocurrencies.
pub async fn get_ranked_prices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
) -> Response {
    if params.limit == 0 {
        return error_response(
            StatusCode::BAD_REQUEST,
            "limit must be a positive integer",
        );
    }

    let datetime = params.datetime.as_deref().unwrap_or(DATETIME_NOW);
    if datetime != DATETIME_NOW {
        return error_response(
            StatusCode::NOT_IMPLEMENTED,
            "this service does not support historical data yet",
        );
    }

    let format = match params.format.as_deref() {
        None => OutputFormat::default(),
        Some(raw) => match raw.parse::<OutputFormat>() {
            Ok(format) => format,
            Err(_) => {
                return error_response(
                    StatusCode::FORBIDDEN,
                    "invalid format, format must be CSV or JSON",
                );
            }
        },
    };

    match state.listing.ranked_prices(params.limit).await {
        Ok(entries) => render(format, &entries),
        Err(application_error) => {
            error!(limit = params.limit, error = %application_error, "listing request failed");
            map_application_error(&application_error)
        }
    }
}

/// Renders the listing in the requested format.
fn render(format: OutputFormat, entries: &[RankedEntry]) -> Response {
    let body = match format {
        OutputFormat::Csv => render_csv(entries),
        OutputFormat::Json => match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(encode_error) => {
                error!(error = %encode_error, "failed to encode listing as json");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to encode response",
                );
            }
        },
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, format.content_type())],
        body,
    )
        .into_response()
}

/// Renders the CSV table; the header row matches the JSON object keys.
#[must_use]
pub fn render_csv(entries: &[RankedEntry]) -> String {
    let mut csv = String::from("Rank,Symbol,Price USD\n");
    for entry in entries {
        csv.push_str(&format!(
            "{},{},{}\n",
            entry.rank, entry.symbol, entry.price_usd
        ));
    }
    csv
}

/// Maps application errors to HTTP statuses; protocol failures fail
/// closed rather than returning stale or empty data.
fn map_application_error(application_error: &ApplicationError) -> Response {
    let status = if application_error.is_timeout() {
        StatusCode::GATEWAY_TIMEOUT
    } else if application_error.is_unsupported_request() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    };
    error_response(status, application_error.to_string())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;
    use crate::application::error::ApplicationResult;
    use crate::domain::value_objects::Symbol;
    use crate::infrastructure::messaging::RpcError;

    fn entries() -> Vec<RankedEntry> {
        vec![
            RankedEntry::new(1, Symbol::new("BTC").unwrap(), 64000.5),
            RankedEntry::new(3, Symbol::new("XRP").unwrap(), 0.52),
        ]
    }

    #[test]
    fn csv_header_matches_json_keys() {
        let csv = render_csv(&entries());
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Rank,Symbol,Price USD");
        assert_eq!(lines.next().unwrap(), "1,BTC,64000.5");
        assert_eq!(lines.next().unwrap(), "3,XRP,0.52");

        let json = serde_json::to_value(entries()).unwrap();
        for key in ["Rank", "Symbol", "Price USD"] {
            assert!(json[0].get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn csv_of_empty_listing_is_header_only() {
        assert_eq!(render_csv(&[]), "Rank,Symbol,Price USD\n");
    }

    #[test]
    fn csv_and_json_carry_the_same_records() {
        let data = entries();
        let json: Vec<RankedEntry> =
            serde_json::from_str(&serde_json::to_string(&data).unwrap()).unwrap();
        let csv = render_csv(&data);
        let csv_rows: Vec<&str> = csv.lines().skip(1).collect();
        assert_eq!(json.len(), csv_rows.len());
        for (entry, row) in json.iter().zip(csv_rows) {
            let cells: Vec<&str> = row.split(',').collect();
            assert_eq!(cells[0], entry.rank.to_string());
            assert_eq!(cells[1], entry.symbol.as_str());
            assert_eq!(cells[2], entry.price_usd.to_string());
        }
    }

    #[test]
    fn timeout_maps_to_gateway_timeout() {
        let err: ApplicationError = RpcError::timeout("no reply").into();
        let response = map_application_error(&err);
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn decode_error_maps_to_bad_gateway() {
        let response = map_application_error(&ApplicationError::decode("bad json"));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    // Stub service used by the routing tests in `routes.rs`.
    pub(crate) struct StubListing {
        pub(crate) result: fn(u32) -> ApplicationResult<Vec<RankedEntry>>,
    }

    #[async_trait::async_trait]
    impl RankedPriceService for StubListing {
        async fn ranked_prices(&self, limit: u32) -> ApplicationResult<Vec<RankedEntry>> {
            (self.result)(limit)
        }
    }
}
