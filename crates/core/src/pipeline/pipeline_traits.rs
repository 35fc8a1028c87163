use async_trait::async_trait;

use super::pipeline_model::PortfolioRequest;
use crate::errors::Result;
use crate::portfolio::Portfolio;
use crate::snapshot::MarketSnapshot;

/// Entrypoints exposed to triggers and the command line.
#[async_trait]
pub trait PipelineServiceTrait: Send + Sync {
    /// Builds, classifies and stores a fresh snapshot.
    ///
    /// At most one run executes at a time; an overlapping call fails with
    /// `Error::PipelineBusy`. On failure the stored snapshot is untouched.
    async fn run_market_analysis(&self) -> Result<MarketSnapshot>;

    async fn generate_portfolio(&self, request: PortfolioRequest) -> Result<Portfolio>;

    fn get_draft(&self, owner_key: &str) -> Result<Option<Portfolio>>;

    async fn delete_draft(&self, owner_key: &str) -> Result<usize>;
}
