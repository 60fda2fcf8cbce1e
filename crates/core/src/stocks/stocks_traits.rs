use async_trait::async_trait;

use super::stocks_model::{CompanyMetadata, CompanyMetadataUpdate, Stock, StockWithMetadata};
use crate::errors::Result;

/// Trait for stock repository operations
#[async_trait]
pub trait StockRepositoryTrait: Send + Sync {
    /// All known stocks ordered by ticker.
    fn list_stocks(&self) -> Result<Vec<Stock>>;
    fn get_stock_by_ticker(&self, ticker: &str) -> Result<Option<Stock>>;
    /// Inserts the stock or overwrites every mutable field of the existing row.
    async fn upsert_stock(&self, stock: &Stock) -> Result<()>;
    fn get_company_metadata(&self, ticker: &str) -> Result<Option<CompanyMetadata>>;
    async fn upsert_company_metadata(&self, metadata: CompanyMetadata) -> Result<CompanyMetadata>;
}

/// Trait for stock service operations
#[async_trait]
pub trait StockServiceTrait: Send + Sync {
    fn list_stocks(&self) -> Result<Vec<Stock>>;
    fn get_stock(&self, ticker: &str) -> Result<Stock>;
    fn get_company_metadata(&self, ticker: &str) -> Result<CompanyMetadata>;
    fn get_stock_with_metadata(&self, ticker: &str) -> Result<StockWithMetadata>;
    async fn update_company_metadata(
        &self,
        ticker: &str,
        update: CompanyMetadataUpdate,
    ) -> Result<CompanyMetadata>;
}
