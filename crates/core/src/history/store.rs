//! History storage trait.
//!
//! Observations are append-only. Appends are keyed on
//! `(stock_id, recorded_at)` for prices and `(stock_id, account_id,
//! recorded_at)` for shareholders; a second write of the same key is a silent
//! no-op, which is what makes a re-run sync job harmless.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::history_model::{PricePoint, ShareholderSnapshot, TimeRange};
use crate::errors::Result;
use crate::stocks::Shareholder;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    // =========================================================================
    // Mutations
    // =========================================================================

    /// Records a price. Returns `false` when a price already exists for the
    /// same stock and timestamp.
    async fn append_price(
        &self,
        stock_id: i32,
        ticker: &str,
        share_price: Decimal,
        recorded_at: NaiveDateTime,
    ) -> Result<bool>;

    /// Records one snapshot row per holder. Returns the number of rows
    /// actually written.
    async fn append_shareholders(
        &self,
        stock_id: i32,
        ticker: &str,
        shareholders: &[Shareholder],
        recorded_at: NaiveDateTime,
    ) -> Result<usize>;

    // =========================================================================
    // Queries
    // =========================================================================

    /// Newest price timestamp across all stocks, used as the sync cursor.
    fn latest_observation_time(&self) -> Result<Option<NaiveDateTime>>;

    /// Raw prices for `ticker` within `range`, oldest first.
    fn price_history(&self, ticker: &str, range: &TimeRange) -> Result<Vec<PricePoint>>;

    /// Shareholder rows for `ticker` within `range`, newest first.
    fn shareholder_history(
        &self,
        ticker: &str,
        account_id: Option<i32>,
        range: &TimeRange,
    ) -> Result<Vec<ShareholderSnapshot>>;
}
