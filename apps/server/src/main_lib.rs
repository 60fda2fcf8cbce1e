use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use stockhist_core::{
    history::{Frequency, HistoryService, HistoryServiceTrait, HistoryStore},
    stocks::{StockService, StockServiceTrait},
    sync::{SyncService, SyncServiceTrait},
};
use stockhist_market_data::ExchangeProvider;
use stockhist_storage_sqlite::{
    db::{self, write_actor},
    HistoryRepository, StockRepository,
};

pub struct AppState {
    pub stock_service: Arc<dyn StockServiceTrait + Send + Sync>,
    pub history_service: Arc<dyn HistoryServiceTrait + Send + Sync>,
    pub sync_service: Arc<dyn SyncServiceTrait + Send + Sync>,
    /// Raw store handle for the scheduler's catch-up check.
    pub history_store: Arc<dyn HistoryStore + Send + Sync>,
    pub default_frequency: Frequency,
    pub admin_api_key: Option<String>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("SH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let stock_repository = Arc::new(StockRepository::new(pool.clone(), writer.clone()));
    let history_repository = Arc::new(HistoryRepository::new(pool.clone(), writer.clone()));

    let stock_service = Arc::new(StockService::new(stock_repository.clone()));
    let history_service = Arc::new(HistoryService::new(history_repository.clone()));

    tracing::info!("Upstream exchange: {}", config.upstream_url);
    let provider = Arc::new(ExchangeProvider::new(config.upstream_url.clone()));
    let sync_service = Arc::new(
        SyncService::new(provider, stock_repository, history_repository.clone())
            .with_detail_throttle(config.detail_throttle),
    );

    if config.admin_api_key.is_none() {
        tracing::warn!("SH_ADMIN_API_KEY is not set; admin routes are disabled");
    }

    Ok(Arc::new(AppState {
        stock_service,
        history_service,
        sync_service,
        history_store: history_repository,
        default_frequency: config.default_frequency,
        admin_api_key: config.admin_api_key.clone(),
        db_path,
    }))
}
