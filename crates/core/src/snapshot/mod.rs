//! Snapshot module - the classified universe partitioned by tier and kind.

mod snapshot_model;
mod snapshot_service;
mod snapshot_traits;

pub use snapshot_model::{MarketSnapshot, SnapshotConfig, SnapshotRecord, TierBucket};
pub use snapshot_service::{assemble_snapshot, build_snapshot, BACKFILL_TARGETS};
pub use snapshot_traits::SnapshotStoreTrait;
