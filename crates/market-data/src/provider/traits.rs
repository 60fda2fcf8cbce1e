//! Upstream provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{RemoteStock, RemoteStockDetail};

/// Source of stock listings and per-stock detail.
///
/// Implementations are plain fetch-and-decode wrappers: they apply their own
/// request timeout but never retry. A failed call is skipped by the caller and
/// attempted again on the next scheduled run.
#[async_trait]
pub trait StockDataProvider: Send + Sync {
    /// Identifier used in logs and error messages (e.g. "EXCHANGE").
    fn id(&self) -> &'static str;

    /// Fetch every listed stock with its current price.
    async fn list_stocks(&self) -> Result<Vec<RemoteStock>, MarketDataError>;

    /// Fetch one stock including its shareholder list.
    async fn fetch_stock_detail(&self, ticker: &str) -> Result<RemoteStockDetail, MarketDataError>;
}
