//! Tierfolio Core - risk tiers, snapshots and portfolio selection.
//!
//! This crate holds the pipeline logic: it samples and enriches the listed
//! universe through `tierfolio-market-data`, trains the risk classifier,
//! assembles the tiered market snapshot and selects portfolios for scored
//! questionnaire answers. Persistence is expressed as traits implemented by
//! the `storage-sqlite` crate.

pub mod errors;
pub mod ml;
pub mod pipeline;
pub mod portfolio;
pub mod profile;
pub mod risk;
pub mod snapshot;
pub mod universe;

pub use pipeline::{PipelineConfig, PipelineService, PipelineServiceTrait, PortfolioRequest};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
