//! Stock domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockhist_market_data::{RemoteShareholder, RemoteStock, RemoteStockDetail};

/// A listed stock.
///
/// `share_price` is the latest observed price; everything else is descriptive
/// and overwritten on every sync. `first_recorded_at` is set when the row is
/// created and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: i32,
    pub ticker: String,
    pub company_name: String,
    pub logo: Option<String>,
    pub outstanding_shares: i64,
    pub frozen: bool,
    pub delisted: bool,
    pub stock_type: String,
    pub book_value: Option<i64>,
    pub dividend_per_share: Option<Decimal>,
    pub dividend_period: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub share_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_recorded_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<NaiveDateTime>,
}

impl From<RemoteStock> for Stock {
    fn from(remote: RemoteStock) -> Self {
        Self {
            id: remote.id,
            ticker: remote.ticker,
            company_name: remote.company_name,
            logo: remote.logo,
            outstanding_shares: remote.outstanding_shares,
            frozen: remote.frozen,
            delisted: remote.delisted,
            stock_type: remote.stock_type,
            book_value: remote.book_value,
            dividend_per_share: remote.dividend_per_share,
            dividend_period: remote.dividend_period,
            created_at: remote.created_at,
            updated_at: remote.updated_at,
            share_price: remote.share_price,
            first_recorded_at: None,
            last_updated_at: None,
        }
    }
}

/// One holder of a stock at sync time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Shareholder {
    pub username: String,
    pub account_id: i32,
    pub shares: i64,
}

impl From<RemoteShareholder> for Shareholder {
    fn from(remote: RemoteShareholder) -> Self {
        Self {
            username: remote.username,
            account_id: remote.account_id,
            shares: remote.shares,
        }
    }
}

/// A stock together with its current holders.
#[derive(Debug, Clone, PartialEq)]
pub struct StockDetail {
    pub stock: Stock,
    pub shareholders: Vec<Shareholder>,
}

impl From<RemoteStockDetail> for StockDetail {
    fn from(remote: RemoteStockDetail) -> Self {
        Self {
            stock: remote.stock.into(),
            shareholders: remote.shareholders.into_iter().map(Into::into).collect(),
        }
    }
}

/// Descriptive company information, maintained by hand through the admin API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMetadata {
    pub stock_id: i32,
    pub ticker: String,
    pub ceo: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub employees: Option<i32>,
    pub founded: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub headquarters: Option<String>,
    pub last_updated_at: Option<NaiveDateTime>,
}

/// Input model for replacing a stock's company metadata.
///
/// Omitted or empty fields are stored as null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMetadataUpdate {
    pub ceo: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub employees: Option<i32>,
    pub founded: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub headquarters: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CompanyMetadataUpdate {
    /// Binds the update to a stock, normalizing blank text to null.
    pub fn into_metadata(self, stock: &Stock) -> CompanyMetadata {
        CompanyMetadata {
            stock_id: stock.id,
            ticker: stock.ticker.clone(),
            ceo: non_empty(self.ceo),
            sector: non_empty(self.sector),
            industry: non_empty(self.industry),
            employees: self.employees.filter(|n| *n != 0),
            founded: non_empty(self.founded),
            website: non_empty(self.website),
            description: non_empty(self.description),
            headquarters: non_empty(self.headquarters),
            last_updated_at: None,
        }
    }
}

/// A stock with its metadata attached, `metadata` null when none was recorded.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockWithMetadata {
    #[serde(flatten)]
    pub stock: Stock,
    pub metadata: Option<CompanyMetadata>,
}
