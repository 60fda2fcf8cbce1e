use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::stocks_model::{CompanyMetadata, CompanyMetadataUpdate, Stock, StockWithMetadata};
use super::stocks_traits::{StockRepositoryTrait, StockServiceTrait};
use crate::errors::{DatabaseError, Result};

/// Read side of the stock catalogue plus the hand-maintained metadata.
pub struct StockService {
    repository: Arc<dyn StockRepositoryTrait>,
}

impl StockService {
    pub fn new(repository: Arc<dyn StockRepositoryTrait>) -> Self {
        Self { repository }
    }
}

fn stock_not_found(ticker: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("Stock with ticker {} not found", ticker))
}

#[async_trait]
impl StockServiceTrait for StockService {
    fn list_stocks(&self) -> Result<Vec<Stock>> {
        self.repository.list_stocks()
    }

    fn get_stock(&self, ticker: &str) -> Result<Stock> {
        self.repository
            .get_stock_by_ticker(ticker)?
            .ok_or_else(|| stock_not_found(ticker).into())
    }

    fn get_company_metadata(&self, ticker: &str) -> Result<CompanyMetadata> {
        self.repository
            .get_company_metadata(ticker)?
            .ok_or_else(|| {
                DatabaseError::NotFound(format!(
                    "Metadata for stock with ticker {} not found",
                    ticker
                ))
                .into()
            })
    }

    fn get_stock_with_metadata(&self, ticker: &str) -> Result<StockWithMetadata> {
        let stock = self.get_stock(ticker)?;
        let metadata = self.repository.get_company_metadata(ticker)?;
        Ok(StockWithMetadata { stock, metadata })
    }

    async fn update_company_metadata(
        &self,
        ticker: &str,
        update: CompanyMetadataUpdate,
    ) -> Result<CompanyMetadata> {
        let stock = self.get_stock(ticker)?;
        debug!("Updating company metadata for {} (id {})", stock.ticker, stock.id);
        self.repository
            .upsert_company_metadata(update.into_metadata(&stock))
            .await
    }
}
