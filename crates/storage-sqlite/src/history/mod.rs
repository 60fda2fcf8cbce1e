//! SQLite storage implementation for price and shareholder history.

mod model;
mod repository;

pub use model::{NewPricePointDB, NewShareholderSnapshotDB, PricePointDB, ShareholderSnapshotDB};
pub use repository::HistoryRepository;
