use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use stockhist_core::stocks::{CompanyMetadata, Stock, StockRepositoryTrait};
use stockhist_core::utils::civil_now;
use stockhist_core::Result;

use super::model::{CompanyMetadataDB, NewStockDB, StockDB, StockUpdateDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{company_metadata, stocks};

pub struct StockRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl StockRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        StockRepository { pool, writer }
    }
}

#[async_trait]
impl StockRepositoryTrait for StockRepository {
    fn list_stocks(&self) -> Result<Vec<Stock>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = stocks::table
            .order(stocks::ticker.asc())
            .select(StockDB::as_select())
            .load::<StockDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Stock::from).collect())
    }

    fn get_stock_by_ticker(&self, ticker: &str) -> Result<Option<Stock>> {
        let mut conn = get_connection(&self.pool)?;
        let row = stocks::table
            .filter(stocks::ticker.eq(ticker))
            .select(StockDB::as_select())
            .first::<StockDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Stock::from))
    }

    async fn upsert_stock(&self, stock: &Stock) -> Result<()> {
        let row = NewStockDB::from_domain(stock, &civil_now());
        let changes = StockUpdateDB::from(&row);
        debug!("Upserting stock {} (id {})", row.ticker, row.id);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(stocks::table)
                    .values(&row)
                    .on_conflict(stocks::id)
                    .do_update()
                    .set(&changes)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn get_company_metadata(&self, ticker: &str) -> Result<Option<CompanyMetadata>> {
        let mut conn = get_connection(&self.pool)?;
        let row = company_metadata::table
            .filter(company_metadata::ticker.eq(ticker))
            .select(CompanyMetadataDB::as_select())
            .first::<CompanyMetadataDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(CompanyMetadata::from))
    }

    async fn upsert_company_metadata(&self, metadata: CompanyMetadata) -> Result<CompanyMetadata> {
        let row = CompanyMetadataDB::from_domain(metadata, &civil_now());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CompanyMetadata> {
                diesel::insert_into(company_metadata::table)
                    .values(&row)
                    .on_conflict(company_metadata::stock_id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let saved = company_metadata::table
                    .find(row.stock_id)
                    .select(CompanyMetadataDB::as_select())
                    .first::<CompanyMetadataDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(CompanyMetadata::from(saved))
            })
            .await
    }
}
