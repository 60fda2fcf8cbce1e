use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use stockhist_core::stocks::{CompanyMetadata, Stock, StockWithMetadata};

async fn list_stocks(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Stock>>> {
    let stocks = state.stock_service.list_stocks()?;
    Ok(Json(stocks))
}

async fn get_stock(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Stock>> {
    let stock = state.stock_service.get_stock(&ticker)?;
    Ok(Json(stock))
}

async fn get_company_metadata(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CompanyMetadata>> {
    let metadata = state.stock_service.get_company_metadata(&ticker)?;
    Ok(Json(metadata))
}

async fn get_stock_with_metadata(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StockWithMetadata>> {
    let full = state.stock_service.get_stock_with_metadata(&ticker)?;
    Ok(Json(full))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks", get(list_stocks))
        .route("/stock/{ticker}", get(get_stock))
        .route("/stock/{ticker}/metadata", get(get_company_metadata))
        .route("/stock/{ticker}/full", get(get_stock_with_metadata))
}
