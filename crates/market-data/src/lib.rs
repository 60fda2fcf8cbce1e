//! stockhist Market Data Crate
//!
//! Fetch-and-decode client for the upstream exchange API.
//!
//! # Overview
//!
//! - [`StockDataProvider`] - the collaborator trait the sync jobs depend on
//! - [`ExchangeProvider`] - reqwest implementation against the exchange REST API
//! - [`RemoteStock`] / [`RemoteStockDetail`] - wire payloads, prices as `Decimal`
//! - [`MarketDataError`] - every transport, status and decode failure
//!
//! Nothing in this crate retries; the scheduler's next firing is the retry.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{RemoteShareholder, RemoteStock, RemoteStockDetail, StockListResponse};
pub use provider::exchange::{ExchangeProvider, DEFAULT_BASE_URL};
pub use provider::StockDataProvider;
