//! SQLite storage implementation for stocks and company metadata.

mod model;
mod repository;

pub use model::{CompanyMetadataDB, NewStockDB, StockDB, StockUpdateDB};
pub use repository::StockRepository;
