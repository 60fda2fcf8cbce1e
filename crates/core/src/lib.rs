//! stockhist Core - Domain entities, services, and traits.
//!
//! This crate contains the sync engine and the bucketed history queries.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod history;
pub mod stocks;
pub mod sync;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

#[cfg(test)]
pub(crate) mod testing;
