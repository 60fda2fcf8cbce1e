//! History module - append-only price and shareholder series, and the
//! frequency-bucketed queries over them.

mod bucket;
mod frequency;
mod history_model;
mod service;
mod store;


pub use bucket::bucketize;
pub use frequency::Frequency;
pub use history_model::{PricePoint, ShareholderSnapshot, TimeRange};
pub use service::{HistoryService, HistoryServiceTrait};
pub use store::HistoryStore;
