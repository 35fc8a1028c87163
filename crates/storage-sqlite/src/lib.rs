//! SQLite storage implementation for Tierfolio.
//!
//! Implements the store traits of `tierfolio-core` with Diesel over SQLite:
//! - connection pooling, pragmas and embedded migrations
//! - a single writer task that applies every write in an immediate transaction
//! - repositories for market snapshots, portfolio drafts and questionnaire answers
//!
//! ```text
//! core (traits)
//!       │
//!       ▼
//! storage-sqlite (this crate)
//!       │
//!       ▼
//!   SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod answers;
pub mod drafts;
pub mod snapshots;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from tierfolio-core for convenience
pub use tierfolio_core::errors::{DatabaseError, Error, Result};
