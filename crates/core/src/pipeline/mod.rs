//! Pipeline module - market analysis runs and portfolio generation.

mod pipeline_model;
mod pipeline_service;
mod pipeline_traits;


pub use pipeline_model::{PipelineConfig, PipelineContext, PortfolioRequest, DEFAULT_SEED};
pub use pipeline_service::PipelineService;
pub use pipeline_traits::PipelineServiceTrait;
