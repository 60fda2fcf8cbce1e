//! Wire models returned by the exchange API.
//!
//! - `stock` - Stock listing and detail payloads (RemoteStock, RemoteStockDetail)

mod stock;

pub use stock::{RemoteShareholder, RemoteStock, RemoteStockDetail, StockListResponse};
