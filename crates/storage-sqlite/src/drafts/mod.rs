//! SQLite storage for per-owner portfolio drafts.

mod model;
mod repository;

pub use model::PortfolioDraftDB;
pub use repository::DraftRepository;
