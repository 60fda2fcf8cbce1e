//! Database models for history rows.

use diesel::prelude::*;
use stockhist_core::history::{PricePoint, ShareholderSnapshot};

use crate::utils::{decimal_or_default, timestamp_or_default};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::stock_historical)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PricePointDB {
    pub id: i64,
    pub stock_id: i32,
    pub ticker: String,
    pub share_price: String,
    pub recorded_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::stock_historical)]
pub struct NewPricePointDB {
    pub stock_id: i32,
    pub ticker: String,
    pub share_price: String,
    pub recorded_at: String,
}

#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::shareholders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ShareholderSnapshotDB {
    pub id: i64,
    pub stock_id: i32,
    pub ticker: String,
    pub username: String,
    pub account_id: i32,
    pub shares: i64,
    pub recorded_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::shareholders)]
pub struct NewShareholderSnapshotDB {
    pub stock_id: i32,
    pub ticker: String,
    pub username: String,
    pub account_id: i32,
    pub shares: i64,
    pub recorded_at: String,
}

impl From<PricePointDB> for PricePoint {
    fn from(db: PricePointDB) -> Self {
        PricePoint {
            id: db.id,
            stock_id: db.stock_id,
            ticker: db.ticker,
            share_price: decimal_or_default(&db.share_price),
            recorded_at: timestamp_or_default(&db.recorded_at),
        }
    }
}

impl From<ShareholderSnapshotDB> for ShareholderSnapshot {
    fn from(db: ShareholderSnapshotDB) -> Self {
        ShareholderSnapshot {
            id: db.id,
            stock_id: db.stock_id,
            ticker: db.ticker,
            username: db.username,
            account_id: db.account_id,
            shares: db.shares,
            recorded_at: timestamp_or_default(&db.recorded_at),
        }
    }
}
