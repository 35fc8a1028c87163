//! Universe module - seeded sampling and enrichment of listed tickers.

mod universe_model;
mod universe_service;

pub use universe_model::{Universe, UniverseConfig, DEFAULT_SAMPLE_SIZE};
pub use universe_service::{sample_tickers, UniverseBuilder};
