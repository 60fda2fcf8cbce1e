//! Database models for stocks and company metadata.

use diesel::prelude::*;
use stockhist_core::stocks::{CompanyMetadata, Stock};

use crate::utils::{decimal_or_default, format_timestamp, parse_timestamp, timestamp_or_default};

/// Database model for stocks
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::stocks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockDB {
    pub id: i32,
    pub ticker: String,
    pub company_name: String,
    pub logo: Option<String>,
    pub outstanding_shares: i64,
    pub frozen: bool,
    pub delisted: bool,
    pub stock_type: String,
    pub book_value: Option<i64>,
    pub dividend_per_share: Option<String>,
    pub dividend_period: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub latest_share_price: String,
    pub first_recorded_at: String,
    pub last_updated_at: String,
}

/// Row written when a stock is first seen.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::stocks)]
pub struct NewStockDB {
    pub id: i32,
    pub ticker: String,
    pub company_name: String,
    pub logo: Option<String>,
    pub outstanding_shares: i64,
    pub frozen: bool,
    pub delisted: bool,
    pub stock_type: String,
    pub book_value: Option<i64>,
    pub dividend_per_share: Option<String>,
    pub dividend_period: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub latest_share_price: String,
    pub first_recorded_at: String,
    pub last_updated_at: String,
}

/// Columns overwritten on every later sync. `first_recorded_at` keeps the
/// value from the first insert.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::stocks)]
#[diesel(treat_none_as_null = true)]
pub struct StockUpdateDB {
    pub ticker: String,
    pub company_name: String,
    pub logo: Option<String>,
    pub outstanding_shares: i64,
    pub frozen: bool,
    pub delisted: bool,
    pub stock_type: String,
    pub book_value: Option<i64>,
    pub dividend_per_share: Option<String>,
    pub dividend_period: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub latest_share_price: String,
    pub last_updated_at: String,
}

impl From<StockDB> for Stock {
    fn from(db: StockDB) -> Self {
        Stock {
            id: db.id,
            ticker: db.ticker,
            company_name: db.company_name,
            logo: db.logo,
            outstanding_shares: db.outstanding_shares,
            frozen: db.frozen,
            delisted: db.delisted,
            stock_type: db.stock_type,
            book_value: db.book_value,
            dividend_per_share: db.dividend_per_share.as_deref().map(decimal_or_default),
            dividend_period: db.dividend_period,
            created_at: db.created_at,
            updated_at: db.updated_at,
            share_price: decimal_or_default(&db.latest_share_price),
            first_recorded_at: parse_timestamp(&db.first_recorded_at),
            last_updated_at: parse_timestamp(&db.last_updated_at),
        }
    }
}

impl NewStockDB {
    /// `now` stands in for bookkeeping timestamps the caller left unset.
    pub fn from_domain(stock: &Stock, now: &chrono::NaiveDateTime) -> Self {
        NewStockDB {
            id: stock.id,
            ticker: stock.ticker.clone(),
            company_name: stock.company_name.clone(),
            logo: stock.logo.clone(),
            outstanding_shares: stock.outstanding_shares,
            frozen: stock.frozen,
            delisted: stock.delisted,
            stock_type: stock.stock_type.clone(),
            book_value: stock.book_value,
            dividend_per_share: stock.dividend_per_share.map(|d| d.to_string()),
            dividend_period: stock.dividend_period.clone(),
            created_at: stock.created_at.clone(),
            updated_at: stock.updated_at.clone(),
            latest_share_price: stock.share_price.to_string(),
            first_recorded_at: format_timestamp(stock.first_recorded_at.as_ref().unwrap_or(now)),
            last_updated_at: format_timestamp(stock.last_updated_at.as_ref().unwrap_or(now)),
        }
    }
}

impl From<&NewStockDB> for StockUpdateDB {
    fn from(row: &NewStockDB) -> Self {
        StockUpdateDB {
            ticker: row.ticker.clone(),
            company_name: row.company_name.clone(),
            logo: row.logo.clone(),
            outstanding_shares: row.outstanding_shares,
            frozen: row.frozen,
            delisted: row.delisted,
            stock_type: row.stock_type.clone(),
            book_value: row.book_value,
            dividend_per_share: row.dividend_per_share.clone(),
            dividend_period: row.dividend_period.clone(),
            created_at: row.created_at.clone(),
            updated_at: row.updated_at.clone(),
            latest_share_price: row.latest_share_price.clone(),
            last_updated_at: row.last_updated_at.clone(),
        }
    }
}

/// Database model for company metadata, one row per stock.
#[derive(
    Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq,
)]
#[diesel(table_name = crate::schema::company_metadata)]
#[diesel(primary_key(stock_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CompanyMetadataDB {
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
    pub last_updated_at: String,
}

impl From<CompanyMetadataDB> for CompanyMetadata {
    fn from(db: CompanyMetadataDB) -> Self {
        CompanyMetadata {
            stock_id: db.stock_id,
            ticker: db.ticker,
            ceo: db.ceo,
            sector: db.sector,
            industry: db.industry,
            employees: db.employees,
            founded: db.founded,
            website: db.website,
            description: db.description,
            headquarters: db.headquarters,
            last_updated_at: Some(timestamp_or_default(&db.last_updated_at)),
        }
    }
}

impl CompanyMetadataDB {
    pub fn from_domain(metadata: CompanyMetadata, now: &chrono::NaiveDateTime) -> Self {
        CompanyMetadataDB {
            stock_id: metadata.stock_id,
            ticker: metadata.ticker,
            ceo: metadata.ceo,
            sector: metadata.sector,
            industry: metadata.industry,
            employees: metadata.employees,
            founded: metadata.founded,
            website: metadata.website,
            description: metadata.description,
            headquarters: metadata.headquarters,
            last_updated_at: format_timestamp(now),
        }
    }
}
