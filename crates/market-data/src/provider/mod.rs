//! Upstream provider abstraction and the exchange implementation.
//!
//! The sync jobs in `stockhist-core` only see the [`StockDataProvider`] trait,
//! which keeps them testable with in-memory fakes.

mod traits;

pub mod exchange;

pub use traits::StockDataProvider;
