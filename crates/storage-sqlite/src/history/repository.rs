use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use stockhist_core::history::{HistoryStore, PricePoint, ShareholderSnapshot, TimeRange};
use stockhist_core::stocks::Shareholder;
use stockhist_core::Result;

use super::model::{
    NewPricePointDB, NewShareholderSnapshotDB, PricePointDB, ShareholderSnapshotDB,
};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{shareholders, stock_historical, stocks};
use crate::utils::{format_timestamp, parse_timestamp};

pub struct HistoryRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl HistoryRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        HistoryRepository { pool, writer }
    }
}

#[async_trait]
impl HistoryStore for HistoryRepository {
    async fn append_price(
        &self,
        stock_id: i32,
        ticker: &str,
        share_price: Decimal,
        recorded_at: NaiveDateTime,
    ) -> Result<bool> {
        let row = NewPricePointDB {
            stock_id,
            ticker: ticker.to_string(),
            share_price: share_price.to_string(),
            recorded_at: format_timestamp(&recorded_at),
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let inserted = diesel::insert_into(stock_historical::table)
                    .values(&row)
                    .on_conflict((stock_historical::stock_id, stock_historical::recorded_at))
                    .do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted > 0)
            })
            .await
    }

    async fn append_shareholders(
        &self,
        stock_id: i32,
        ticker: &str,
        holders: &[Shareholder],
        recorded_at: NaiveDateTime,
    ) -> Result<usize> {
        if holders.is_empty() {
            return Ok(0);
        }
        let recorded_at = format_timestamp(&recorded_at);
        let rows: Vec<NewShareholderSnapshotDB> = holders
            .iter()
            .map(|h| NewShareholderSnapshotDB {
                stock_id,
                ticker: ticker.to_string(),
                username: h.username.clone(),
                account_id: h.account_id,
                shares: h.shares,
                recorded_at: recorded_at.clone(),
            })
            .collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut written = 0;
                for row in &rows {
                    written += diesel::insert_into(shareholders::table)
                        .values(row)
                        .on_conflict((
                            shareholders::stock_id,
                            shareholders::account_id,
                            shareholders::recorded_at,
                        ))
                        .do_nothing()
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(written)
            })
            .await
    }

    fn latest_observation_time(&self) -> Result<Option<NaiveDateTime>> {
        let mut conn = get_connection(&self.pool)?;
        let latest = stock_historical::table
            .select(max(stock_historical::recorded_at))
            .first::<Option<String>>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(latest.as_deref().and_then(parse_timestamp))
    }

    fn price_history(&self, ticker: &str, range: &TimeRange) -> Result<Vec<PricePoint>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = stock_historical::table
            .inner_join(stocks::table)
            .filter(stocks::ticker.eq(ticker))
            .select(PricePointDB::as_select())
            .into_boxed();

        if let Some(from) = range.from {
            query = query.filter(stock_historical::recorded_at.ge(format_timestamp(&from)));
        }
        if let Some(to) = range.to {
            query = query.filter(stock_historical::recorded_at.le(format_timestamp(&to)));
        }

        let rows = query
            .order((stock_historical::recorded_at.asc(), stock_historical::id.asc()))
            .load::<PricePointDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(PricePoint::from).collect())
    }

    fn shareholder_history(
        &self,
        ticker: &str,
        account_id: Option<i32>,
        range: &TimeRange,
    ) -> Result<Vec<ShareholderSnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = shareholders::table
            .inner_join(stocks::table)
            .filter(stocks::ticker.eq(ticker))
            .select(ShareholderSnapshotDB::as_select())
            .into_boxed();

        if let Some(account) = account_id {
            query = query.filter(shareholders::account_id.eq(account));
        }
        if let Some(from) = range.from {
            query = query.filter(shareholders::recorded_at.ge(format_timestamp(&from)));
        }
        if let Some(to) = range.to {
            query = query.filter(shareholders::recorded_at.le(format_timestamp(&to)));
        }

        let rows = query
            .order((shareholders::recorded_at.desc(), shareholders::id.asc()))
            .load::<ShareholderSnapshotDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(ShareholderSnapshot::from).collect())
    }
}
