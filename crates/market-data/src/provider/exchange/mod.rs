//! Exchange API provider implementation.
//!
//! # API Endpoints
//!
//! - Stock list: `{base}/stocks` returning `{"stocks": [...]}`
//! - Stock detail: `{base}/stock/{ticker}` returning the stock plus `shareholders`
//!
//! Prices come back as decimal strings.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{RemoteStock, RemoteStockDetail, StockListResponse};
use crate::provider::StockDataProvider;

pub const DEFAULT_BASE_URL: &str = "https://theexchange.apps.vertilehosting.com";
const PROVIDER_ID: &str = "EXCHANGE";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Exchange API client.
///
/// # Example
///
/// ```ignore
/// let provider = ExchangeProvider::new(DEFAULT_BASE_URL);
/// let stocks = provider.list_stocks().await?;
/// ```
pub struct ExchangeProvider {
    client: Client,
    base_url: String,
}

impl ExchangeProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL extended with `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MarketDataError> {
        let invalid = || MarketDataError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn stocks_url(&self) -> Result<Url, MarketDataError> {
        self.endpoint(&["stocks"])
    }

    fn stock_url(&self, ticker: &str) -> Result<Url, MarketDataError> {
        self.endpoint(&["stock", ticker.trim()])
    }

    /// GET `url` and decode the JSON body, mapping transport and status failures.
    async fn fetch<T: DeserializeOwned>(
        &self,
        url: Url,
        ticker: Option<&str>,
    ) -> Result<T, MarketDataError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, ticker));
        }

        let body = response.text().await.map_err(MarketDataError::Network)?;
        serde_json::from_str(&body).map_err(|e| MarketDataError::Decode {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        })
    }
}

fn status_error(status: StatusCode, ticker: Option<&str>) -> MarketDataError {
    match (status, ticker) {
        (StatusCode::TOO_MANY_REQUESTS, _) => MarketDataError::RateLimited {
            provider: PROVIDER_ID.to_string(),
        },
        (StatusCode::NOT_FOUND, Some(ticker)) => MarketDataError::SymbolNotFound(ticker.to_string()),
        _ => MarketDataError::Http {
            provider: PROVIDER_ID.to_string(),
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
        },
    }
}

#[async_trait]
impl StockDataProvider for ExchangeProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn list_stocks(&self) -> Result<Vec<RemoteStock>, MarketDataError> {
        let response: StockListResponse = self.fetch(self.stocks_url()?, None).await?;
        Ok(response.stocks)
    }

    async fn fetch_stock_detail(&self, ticker: &str) -> Result<RemoteStockDetail, MarketDataError> {
        self.fetch(self.stock_url(ticker)?, Some(ticker)).await
    }
}
