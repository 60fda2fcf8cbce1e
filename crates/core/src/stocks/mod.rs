//! Stocks module - listed entities, their holders and company metadata.

mod stocks_model;
mod stocks_service;
mod stocks_traits;


pub use stocks_model::{
    CompanyMetadata, CompanyMetadataUpdate, Shareholder, Stock, StockDetail, StockWithMetadata,
};
pub use stocks_service::StockService;
pub use stocks_traits::{StockRepositoryTrait, StockServiceTrait};
