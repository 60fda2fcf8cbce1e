use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState, models::format_civil};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use stockhist_core::history::Frequency;

#[derive(Serialize)]
pub struct Banner {
    success: bool,
    message: &'static str,
}

pub async fn banner() -> Json<Banner> {
    Json(Banner {
        success: true,
        message: "Stock history API",
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthStatus {
    status: &'static str,
    last_recorded_at: Option<String>,
}

/// Liveness plus the store's sync cursor.
async fn healthz(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthStatus>> {
    let last = state.history_store.latest_observation_time()?;
    Ok(Json(HealthStatus {
        status: "ok",
        last_recorded_at: last.map(|ts| format_civil(&ts, Frequency::Raw)),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/healthz", get(healthz))
}
