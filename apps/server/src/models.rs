//! Response shapes of the HTTP API.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use stockhist_core::history::{Frequency, PricePoint, ShareholderSnapshot};

/// Suffix marking civil timestamps in responses.
const ZONE_LABEL: &str = "EST";

/// `YYYY-MM-DD EST` for daily and coarser buckets, `YYYY-MM-DD HH:MM:SS EST` otherwise.
pub fn format_civil(ts: &NaiveDateTime, frequency: Frequency) -> String {
    format!("{} {}", format_date(ts, frequency), ZONE_LABEL)
}

/// Like [`format_civil`] without the zone label.
pub fn format_date(ts: &NaiveDateTime, frequency: Frequency) -> String {
    if frequency.is_date_only() {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPrice {
    pub id: i64,
    pub stock_id: i32,
    pub ticker: String,
    pub share_price: Decimal,
    pub timestamp: String,
}

impl HistoricalPrice {
    pub fn from_point(point: PricePoint, frequency: Frequency) -> Self {
        Self {
            id: point.id,
            stock_id: point.stock_id,
            ticker: point.ticker,
            share_price: point.share_price,
            timestamp: format_civil(&point.recorded_at, frequency),
        }
    }
}

/// OHLC row; the store only has one value per bucket so every price is equal.
#[derive(Serialize, Debug, Clone)]
pub struct StandardBar {
    pub date: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub adjusted_close: Decimal,
    pub volume: u64,
}

impl StandardBar {
    pub fn from_point(point: &PricePoint, frequency: Frequency) -> Self {
        let price = point.share_price;
        Self {
            date: format_date(&point.recorded_at, frequency),
            open: price,
            high: price,
            low: price,
            close: price,
            adjusted_close: price,
            volume: 0,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct StandardHistory {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
    pub frequency: String,
    pub data: Vec<StandardBar>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalShareholder {
    pub id: i64,
    pub stock_id: i32,
    pub ticker: String,
    pub username: String,
    pub account_id: i32,
    pub shares: i64,
    pub timestamp: String,
}

impl From<ShareholderSnapshot> for HistoricalShareholder {
    fn from(s: ShareholderSnapshot) -> Self {
        Self {
            id: s.id,
            stock_id: s.stock_id,
            ticker: s.ticker,
            username: s.username,
            account_id: s.account_id,
            shares: s.shares,
            timestamp: format_civil(&s.recorded_at, Frequency::Raw),
        }
    }
}

/// Body of successful admin actions.
#[derive(Serialize, Debug, Clone)]
pub struct ActionResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T: Serialize> ActionResponse<T> {
    pub fn ok(message: impl Into<String>, result: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            result: Some(result),
        }
    }
}
