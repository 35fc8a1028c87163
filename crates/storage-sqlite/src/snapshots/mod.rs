//! SQLite storage for market snapshots.

mod model;
mod repository;

pub use model::MarketSnapshotDB;
pub use repository::SnapshotRepository;
