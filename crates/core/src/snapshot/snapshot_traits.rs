//! Snapshot store contract.

use async_trait::async_trait;

use super::snapshot_model::SnapshotRecord;
use crate::errors::Result;

/// Persistence for the latest market snapshot.
///
/// `save` replaces the whole stored document; a reader sees either the
/// previous record or the new one.
#[async_trait]
pub trait SnapshotStoreTrait: Send + Sync {
    /// Returns the most recent snapshot, or `None` if no run has completed yet.
    fn load(&self) -> Result<Option<SnapshotRecord>>;

    async fn save(&self, record: &SnapshotRecord) -> Result<()>;
}
