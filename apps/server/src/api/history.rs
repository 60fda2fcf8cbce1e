use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{HistoricalPrice, HistoricalShareholder, StandardBar, StandardHistory},
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use stockhist_core::history::{Frequency, TimeRange};

/// Query values arrive as strings; blank ones count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct HistoricalQuery {
    start_date: Option<String>,
    end_date: Option<String>,
    frequency: Option<String>,
    format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseFormat {
    Default,
    Standard,
}

impl ResponseFormat {
    /// Anything but `standard` falls back to the default shape.
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(f) if f.eq_ignore_ascii_case("standard") => ResponseFormat::Standard,
            _ => ResponseFormat::Default,
        }
    }
}

async fn get_historical_prices(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoricalQuery>,
) -> ApiResult<Response> {
    let frequency = match present(&q.frequency) {
        Some(raw) => raw.parse::<Frequency>()?,
        None => state.default_frequency,
    };
    let start = present(&q.start_date);
    let end = present(&q.end_date);
    let range = TimeRange::from_query(start, end)?;

    let points = state
        .history_service
        .price_history(&ticker, &range, frequency)?;
    tracing::debug!(
        "{} {} prices for {} in {:?}",
        points.len(),
        frequency,
        ticker,
        range
    );

    let response = match ResponseFormat::parse(present(&q.format)) {
        ResponseFormat::Standard => Json(StandardHistory {
            data: points
                .iter()
                .map(|p| StandardBar::from_point(p, frequency))
                .collect(),
            ticker,
            start_date: start.unwrap_or_default().to_string(),
            end_date: end.unwrap_or_default().to_string(),
            frequency: frequency.as_str().to_string(),
        })
        .into_response(),
        ResponseFormat::Default => Json(
            points
                .into_iter()
                .map(|p| HistoricalPrice::from_point(p, frequency))
                .collect::<Vec<_>>(),
        )
        .into_response(),
    };
    Ok(response)
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ShareholderQuery {
    account_id: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

async fn get_shareholder_history(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<ShareholderQuery>,
) -> ApiResult<Json<Vec<HistoricalShareholder>>> {
    let account_id = present(&q.account_id)
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid accountId '{}'", raw)))
        })
        .transpose()?;
    let range = TimeRange::from_query(present(&q.start_date), present(&q.end_date))?;

    let rows = state
        .history_service
        .shareholder_history(&ticker, account_id, &range)?;
    Ok(Json(rows.into_iter().map(HistoricalShareholder::from).collect()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stock/{ticker}/historical", get(get_historical_prices))
        .route("/stock/{ticker}/shareholders", get(get_shareholder_history))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_values_are_absent() {
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some("  ".to_string())), None);
        assert_eq!(present(&Some(" 2024-03-04 ".to_string())), Some("2024-03-04"));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(ResponseFormat::parse(None), ResponseFormat::Default);
        assert_eq!(ResponseFormat::parse(Some("Standard")), ResponseFormat::Standard);
        assert_eq!(ResponseFormat::parse(Some("csv")), ResponseFormat::Default);
    }
}
