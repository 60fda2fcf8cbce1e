use log::debug;
use std::sync::Arc;

use super::bucket::bucketize;
use super::frequency::Frequency;
use super::history_model::{PricePoint, ShareholderSnapshot, TimeRange};
use super::store::HistoryStore;
use crate::errors::Result;

/// Query side of the history store.
pub trait HistoryServiceTrait: Send + Sync {
    /// Bucketed prices for `ticker`, newest first. Unknown tickers yield an
    /// empty series.
    fn price_history(
        &self,
        ticker: &str,
        range: &TimeRange,
        frequency: Frequency,
    ) -> Result<Vec<PricePoint>>;

    fn shareholder_history(
        &self,
        ticker: &str,
        account_id: Option<i32>,
        range: &TimeRange,
    ) -> Result<Vec<ShareholderSnapshot>>;
}

pub struct HistoryService {
    store: Arc<dyn HistoryStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }
}

impl HistoryServiceTrait for HistoryService {
    fn price_history(
        &self,
        ticker: &str,
        range: &TimeRange,
        frequency: Frequency,
    ) -> Result<Vec<PricePoint>> {
        range.validate()?;
        let raw = self.store.price_history(ticker, range)?;
        debug!(
            "Bucketing {} raw prices for {} at {}",
            raw.len(),
            ticker,
            frequency
        );
        Ok(bucketize(raw, frequency))
    }

    fn shareholder_history(
        &self,
        ticker: &str,
        account_id: Option<i32>,
        range: &TimeRange,
    ) -> Result<Vec<ShareholderSnapshot>> {
        range.validate()?;
        self.store.shareholder_history(ticker, account_id, range)
    }
}
