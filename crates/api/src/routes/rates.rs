//! Rate resolution endpoint.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use fxrates_shared::{CurrencyCode, RateError, RateResult};

use crate::AppState;

/// Creates the rate resolution routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_rates))
}

/// Query parameters for a rate lookup.
#[derive(Debug, Deserialize)]
pub struct RatesQuery {
    /// Base currency code.
    pub base: String,
    /// Optional comma-separated quote currency codes.
    pub quotes: Option<String>,
    /// Optional amount of the base currency to convert per quote.
    pub amount: Option<Decimal>,
}

/// Response for a rate lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    /// Base currency all rates are expressed against.
    pub base: CurrencyCode,
    /// Timestamp the snapshot is valid as of.
    pub as_of: DateTime<Utc>,
    /// Rates keyed by quote currency.
    pub rates: BTreeMap<CurrencyCode, Decimal>,
    /// Converted amounts per quote, present when `amount` was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted: Option<BTreeMap<CurrencyCode, Decimal>>,
}

/// GET `/` - Resolve current exchange rates for a base currency.
async fn get_rates(State(state): State<AppState>, Query(query): Query<RatesQuery>) -> Response {
    match resolve_rates(&state, query).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn resolve_rates(state: &AppState, query: RatesQuery) -> RateResult<RatesResponse> {
    let base = CurrencyCode::new(&query.base)?;
    let quotes = parse_quotes(query.quotes.as_deref())?;

    let snapshot = state.resolver.resolve(&base, &quotes).await?;

    let converted = query.amount.map(|amount| {
        snapshot
            .rates()
            .keys()
            .filter_map(|quote| {
                snapshot
                    .rate_for(quote)
                    .map(|fx| (quote.clone(), fx.convert(amount)))
            })
            .collect()
    });

    Ok(RatesResponse {
        base: snapshot.base().clone(),
        as_of: snapshot.as_of(),
        rates: snapshot.rates().clone(),
        converted,
    })
}

/// Splits a comma-separated quote list into validated currency codes.
fn parse_quotes(raw: Option<&str>) -> RateResult<Vec<CurrencyCode>> {
    match raw {
        None => Ok(Vec::new()),
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(CurrencyCode::new)
            .collect(),
    }
}

fn error_response(err: &RateError) -> Response {
    warn!(code = err.error_code(), error = %err, "rate request failed");

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
