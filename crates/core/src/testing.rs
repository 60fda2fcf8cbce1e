//! In-memory store and provider doubles shared by the unit tests.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use stockhist_market_data::{
    MarketDataError, RemoteShareholder, RemoteStock, RemoteStockDetail, StockDataProvider,
};

use crate::errors::{DatabaseError, Result};
use crate::history::{HistoryStore, PricePoint, ShareholderSnapshot, TimeRange};
use crate::stocks::{CompanyMetadata, Shareholder, Stock, StockRepositoryTrait};

/// Store double honouring the dedup keys of the real schema.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub stocks: Arc<Mutex<HashMap<i32, Stock>>>,
    pub prices: Arc<Mutex<Vec<PricePoint>>>,
    pub shareholders: Arc<Mutex<Vec<ShareholderSnapshot>>>,
    pub metadata: Arc<Mutex<HashMap<i32, CompanyMetadata>>>,
    pub fail_writes_for: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes_for(&self, ticker: &str) {
        self.fail_writes_for.lock().unwrap().push(ticker.to_string());
    }

    pub fn seed_price(&self, stock_id: i32, ticker: &str, price: Decimal, at: NaiveDateTime) {
        let mut prices = self.prices.lock().unwrap();
        let id = prices.len() as i64 + 1;
        prices.push(PricePoint {
            id,
            stock_id,
            ticker: ticker.to_string(),
            share_price: price,
            recorded_at: at,
        });
    }

    fn check_writable(&self, ticker: &str) -> Result<()> {
        if self.fail_writes_for.lock().unwrap().iter().any(|t| t == ticker) {
            return Err(DatabaseError::QueryFailed(format!("write rejected for {}", ticker)).into());
        }
        Ok(())
    }

    fn stock_id_for(&self, ticker: &str) -> Option<i32> {
        self.stocks
            .lock()
            .unwrap()
            .values()
            .find(|s| s.ticker == ticker)
            .map(|s| s.id)
    }
}

#[async_trait]
impl StockRepositoryTrait for MemoryStore {
    fn list_stocks(&self) -> Result<Vec<Stock>> {
        let mut stocks: Vec<Stock> = self.stocks.lock().unwrap().values().cloned().collect();
        stocks.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        Ok(stocks)
    }

    fn get_stock_by_ticker(&self, ticker: &str) -> Result<Option<Stock>> {
        Ok(self
            .stocks
            .lock()
            .unwrap()
            .values()
            .find(|s| s.ticker == ticker)
            .cloned())
    }

    async fn upsert_stock(&self, stock: &Stock) -> Result<()> {
        self.check_writable(&stock.ticker)?;
        let mut stocks = self.stocks.lock().unwrap();
        let first_recorded_at = stocks.get(&stock.id).and_then(|s| s.first_recorded_at);
        let mut stored = stock.clone();
        stored.first_recorded_at = first_recorded_at.or(stock.first_recorded_at);
        stocks.insert(stock.id, stored);
        Ok(())
    }

    fn get_company_metadata(&self, ticker: &str) -> Result<Option<CompanyMetadata>> {
        Ok(self
            .metadata
            .lock()
            .unwrap()
            .values()
            .find(|m| m.ticker == ticker)
            .cloned())
    }

    async fn upsert_company_metadata(&self, metadata: CompanyMetadata) -> Result<CompanyMetadata> {
        self.metadata
            .lock()
            .unwrap()
            .insert(metadata.stock_id, metadata.clone());
        Ok(metadata)
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn append_price(
        &self,
        stock_id: i32,
        ticker: &str,
        share_price: Decimal,
        recorded_at: NaiveDateTime,
    ) -> Result<bool> {
        self.check_writable(ticker)?;
        let exists = self
            .prices
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.stock_id == stock_id && p.recorded_at == recorded_at);
        if exists {
            return Ok(false);
        }
        self.seed_price(stock_id, ticker, share_price, recorded_at);
        Ok(true)
    }

    async fn append_shareholders(
        &self,
        stock_id: i32,
        ticker: &str,
        shareholders: &[Shareholder],
        recorded_at: NaiveDateTime,
    ) -> Result<usize> {
        self.check_writable(ticker)?;
        let mut rows = self.shareholders.lock().unwrap();
        let mut written = 0;
        for holder in shareholders {
            let exists = rows.iter().any(|r| {
                r.stock_id == stock_id
                    && r.account_id == holder.account_id
                    && r.recorded_at == recorded_at
            });
            if exists {
                continue;
            }
            let id = rows.len() as i64 + 1;
            rows.push(ShareholderSnapshot {
                id,
                stock_id,
                ticker: ticker.to_string(),
                username: holder.username.clone(),
                account_id: holder.account_id,
                shares: holder.shares,
                recorded_at,
            });
            written += 1;
        }
        Ok(written)
    }

    fn latest_observation_time(&self) -> Result<Option<NaiveDateTime>> {
        Ok(self.prices.lock().unwrap().iter().map(|p| p.recorded_at).max())
    }

    fn price_history(&self, ticker: &str, range: &TimeRange) -> Result<Vec<PricePoint>> {
        let Some(stock_id) = self.stock_id_for(ticker) else {
            return Ok(Vec::new());
        };
        let mut out: Vec<PricePoint> = self
            .prices
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.stock_id == stock_id && range.contains(&p.recorded_at))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at));
        Ok(out)
    }

    fn shareholder_history(
        &self,
        ticker: &str,
        account_id: Option<i32>,
        range: &TimeRange,
    ) -> Result<Vec<ShareholderSnapshot>> {
        let Some(stock_id) = self.stock_id_for(ticker) else {
            return Ok(Vec::new());
        };
        let mut out: Vec<ShareholderSnapshot> = self
            .shareholders
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.stock_id == stock_id)
            .filter(|r| account_id.map_or(true, |a| r.account_id == a))
            .filter(|r| range.contains(&r.recorded_at))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(out)
    }
}

/// Provider double with scripted stocks and per-ticker failures.
#[derive(Clone, Default)]
pub struct MockProvider {
    pub stocks: Arc<Mutex<Vec<RemoteStock>>>,
    pub holders: Arc<Mutex<HashMap<String, Vec<RemoteShareholder>>>>,
    pub failing_tickers: Arc<Mutex<Vec<String>>>,
    pub fail_listing: Arc<Mutex<bool>>,
    pub list_calls: Arc<Mutex<usize>>,
    pub detail_calls: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn with_stocks(stocks: Vec<RemoteStock>) -> Self {
        let provider = Self::default();
        *provider.stocks.lock().unwrap() = stocks;
        provider
    }

    pub fn set_price(&self, ticker: &str, price: Decimal) {
        for stock in self.stocks.lock().unwrap().iter_mut() {
            if stock.ticker == ticker {
                stock.share_price = price;
            }
        }
    }

    pub fn set_holders(&self, ticker: &str, holders: Vec<RemoteShareholder>) {
        self.holders
            .lock()
            .unwrap()
            .insert(ticker.to_string(), holders);
    }

    pub fn fail_detail_for(&self, ticker: &str) {
        self.failing_tickers.lock().unwrap().push(ticker.to_string());
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StockDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn list_stocks(&self) -> std::result::Result<Vec<RemoteStock>, MarketDataError> {
        *self.list_calls.lock().unwrap() += 1;
        if *self.fail_listing.lock().unwrap() {
            return Err(MarketDataError::Http {
                provider: "MOCK".to_string(),
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(self.stocks.lock().unwrap().clone())
    }

    async fn fetch_stock_detail(
        &self,
        ticker: &str,
    ) -> std::result::Result<RemoteStockDetail, MarketDataError> {
        self.detail_calls.lock().unwrap().push(ticker.to_string());
        if self.failing_tickers.lock().unwrap().iter().any(|t| t == ticker) {
            return Err(MarketDataError::Timeout {
                provider: "MOCK".to_string(),
            });
        }
        let stock = self
            .stocks
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.ticker == ticker)
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(ticker.to_string()))?;
        let shareholders = self
            .holders
            .lock()
            .unwrap()
            .get(ticker)
            .cloned()
            .unwrap_or_default();
        Ok(RemoteStockDetail {
            stock,
            shareholders,
        })
    }
}

pub fn remote_stock(id: i32, ticker: &str, price: Decimal) -> RemoteStock {
    RemoteStock {
        id,
        ticker: ticker.to_string(),
        company_name: format!("{} Holdings", ticker),
        logo: None,
        outstanding_shares: 100_000,
        frozen: false,
        delisted: false,
        stock_type: "common".to_string(),
        book_value: None,
        dividend_per_share: None,
        dividend_period: None,
        created_at: "2024-01-02T15:04:05.000Z".to_string(),
        updated_at: "2024-01-02T15:04:05.000Z".to_string(),
        share_price: price,
    }
}

pub fn holder(account_id: i32, username: &str, shares: i64) -> RemoteShareholder {
    RemoteShareholder {
        username: username.to_string(),
        shares,
        account_id,
    }
}

pub fn civil(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
}
