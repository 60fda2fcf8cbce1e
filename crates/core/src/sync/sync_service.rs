use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use stockhist_market_data::StockDataProvider;

use super::sync_model::{StockRefresh, SyncJobKind, SyncSummary};
use crate::constants::DEFAULT_DETAIL_THROTTLE;
use crate::errors::{Error, Result};
use crate::history::HistoryStore;
use crate::stocks::{Stock, StockDetail, StockRepositoryTrait};
use crate::utils::time_utils::civil_now;

/// Source of the civil timestamp stamped on recorded rows.
pub type CivilClock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Refresh jobs the scheduler and the admin API can run.
#[async_trait]
pub trait SyncServiceTrait: Send + Sync {
    /// Lists all stocks once and records the latest price of each.
    async fn refresh_values(&self) -> Result<SyncSummary>;

    /// Fetches every stock's detail and records price and shareholders,
    /// pausing between stocks.
    async fn refresh_details(&self) -> Result<SyncSummary>;

    /// Detail refresh for one ticker. Errors propagate to the caller.
    async fn refresh_stock(&self, ticker: &str) -> Result<StockRefresh>;
}

pub struct SyncService {
    provider: Arc<dyn StockDataProvider>,
    stocks: Arc<dyn StockRepositoryTrait>,
    history: Arc<dyn HistoryStore>,
    detail_throttle: Duration,
    clock: CivilClock,
}

impl SyncService {
    pub fn new(
        provider: Arc<dyn StockDataProvider>,
        stocks: Arc<dyn StockRepositoryTrait>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            provider,
            stocks,
            history,
            detail_throttle: DEFAULT_DETAIL_THROTTLE,
            clock: Arc::new(civil_now),
        }
    }

    pub fn with_detail_throttle(mut self, throttle: Duration) -> Self {
        self.detail_throttle = throttle;
        self
    }

    pub fn with_clock(mut self, clock: CivilClock) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    /// Upserts the stock and records its price, both stamped `recorded_at`.
    async fn record_stock(&self, mut stock: Stock, recorded_at: NaiveDateTime) -> Result<bool> {
        stock.first_recorded_at = Some(recorded_at);
        stock.last_updated_at = Some(recorded_at);
        self.stocks.upsert_stock(&stock).await?;
        self.history
            .append_price(stock.id, &stock.ticker, stock.share_price, recorded_at)
            .await
    }

    async fn record_detail(&self, detail: StockDetail) -> Result<StockRefresh> {
        let recorded_at = self.now();
        let StockDetail {
            stock,
            shareholders,
        } = detail;
        let (stock_id, ticker) = (stock.id, stock.ticker.clone());

        let price_recorded = self.record_stock(stock, recorded_at).await?;
        let shareholders_recorded = self
            .history
            .append_shareholders(stock_id, &ticker, &shareholders, recorded_at)
            .await?;

        debug!(
            "Recorded {} at {}: price {}, {} shareholders",
            ticker,
            recorded_at,
            if price_recorded { "written" } else { "already present" },
            shareholders_recorded
        );
        Ok(StockRefresh {
            ticker,
            price_recorded,
            shareholders_recorded,
        })
    }

    async fn fetch_and_record(&self, ticker: &str) -> Result<StockRefresh> {
        let detail = self.provider.fetch_stock_detail(ticker).await?;
        self.record_detail(detail.into()).await
    }
}

/// Upstream hiccups that the next run will likely clear are only warned about.
fn log_stock_failure(action: &str, ticker: &str, e: &Error) {
    if e.is_transient() {
        warn!("Failed to {} for {} (will retry next run): {}", action, ticker, e);
    } else {
        error!("Failed to {} for {}: {}", action, ticker, e);
    }
}

#[async_trait]
impl SyncServiceTrait for SyncService {
    async fn refresh_values(&self) -> Result<SyncSummary> {
        info!("Starting values refresh from {}", self.provider.id());
        let listed = self.provider.list_stocks().await?;
        let mut summary = SyncSummary::new(SyncJobKind::Values, listed.len());

        for remote in listed {
            let stock = Stock::from(remote);
            let ticker = stock.ticker.clone();
            match self.record_stock(stock, self.now()).await {
                Ok(_) => summary.record_success(),
                Err(e) => {
                    log_stock_failure("record value", &ticker, &e);
                    summary.record_failure(&ticker, e.to_string());
                }
            }
        }

        info!("Finished {}", summary);
        Ok(summary)
    }

    async fn refresh_details(&self) -> Result<SyncSummary> {
        info!("Starting details refresh from {}", self.provider.id());
        let listed = self.provider.list_stocks().await?;
        let total = listed.len();
        let mut summary = SyncSummary::new(SyncJobKind::Details, total);

        for (index, remote) in listed.into_iter().enumerate() {
            match self.fetch_and_record(&remote.ticker).await {
                Ok(_) => summary.record_success(),
                Err(e) => {
                    log_stock_failure("refresh details", &remote.ticker, &e);
                    summary.record_failure(&remote.ticker, e.to_string());
                }
            }

            if index + 1 < total && !self.detail_throttle.is_zero() {
                tokio::time::sleep(self.detail_throttle).await;
            }
        }

        info!("Finished {}", summary);
        Ok(summary)
    }

    async fn refresh_stock(&self, ticker: &str) -> Result<StockRefresh> {
        info!("Refreshing details for {}", ticker);
        self.fetch_and_record(ticker).await
    }
}
