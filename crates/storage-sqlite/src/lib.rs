//! SQLite storage implementation for stockhist.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `stockhist-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for stocks, company metadata and history
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!         core (domain, sync, scheduler)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! All writes go through a single writer actor ([`WriteHandle`]); reads use
//! the r2d2 pool directly.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod history;
pub mod stocks;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use history::HistoryRepository;
pub use stocks::StockRepository;

// Re-export core error types for convenience
pub use stockhist_core::errors::{DatabaseError, Error, Result};
