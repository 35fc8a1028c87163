//! Draft store contract.

use async_trait::async_trait;

use super::portfolio_model::Portfolio;
use crate::errors::Result;

/// Per-owner storage of the last generated portfolio.
#[async_trait]
pub trait DraftStoreTrait: Send + Sync {
    fn load(&self, owner_key: &str) -> Result<Option<Portfolio>>;

    /// Replaces the owner's draft.
    async fn save(&self, owner_key: &str, portfolio: &Portfolio) -> Result<()>;

    /// Removes the owner's draft. Returns the number of deleted drafts.
    async fn delete(&self, owner_key: &str) -> Result<usize>;
}
