//! Write routes, guarded by the `X-API-Key` header.

use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::ActionResponse,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::post,
    Json, Router,
};
use stockhist_core::{
    stocks::{CompanyMetadata, CompanyMetadataUpdate},
    sync::{StockRefresh, SyncSummary},
};

pub const API_KEY_HEADER: &str = "x-api-key";

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

pub async fn require_admin_key(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let forbidden = || ApiError::Forbidden("Unauthorized. Valid API key required.".to_string());

    let expected = state.admin_api_key.as_deref().ok_or_else(forbidden)?;
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(forbidden)?;

    if !constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        tracing::warn!("Rejected admin request to {}", request.uri().path());
        return Err(forbidden());
    }
    Ok(next.run(request).await)
}

async fn fetch_stocks(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ActionResponse<SyncSummary>>> {
    let summary = state.sync_service.refresh_values().await?;
    let message = format!(
        "Fetched and stored {} of {} stocks",
        summary.succeeded, summary.total
    );
    Ok(Json(ActionResponse::ok(message, summary)))
}

async fn fetch_stock(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ActionResponse<StockRefresh>>> {
    let refresh = state.sync_service.refresh_stock(&ticker).await?;
    let message = format!("Fetched and stored details for {}", refresh.ticker);
    Ok(Json(ActionResponse::ok(message, refresh)))
}

async fn update_company_metadata(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<CompanyMetadataUpdate>,
) -> ApiResult<Json<ActionResponse<CompanyMetadata>>> {
    let metadata = state
        .stock_service
        .update_company_metadata(&ticker, update)
        .await?;
    let message = format!("Updated metadata for {}", ticker);
    Ok(Json(ActionResponse::ok(message, metadata)))
}

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/fetch-stocks", post(fetch_stocks))
        .route("/fetch-stock/{ticker}", post(fetch_stock))
        .route("/stock/{ticker}/metadata", post(update_company_metadata))
        .route_layer(middleware::from_fn_with_state(state, require_admin_key))
}
