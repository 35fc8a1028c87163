//! Database model for market snapshots.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use tierfolio_core::snapshot::{MarketSnapshot, SnapshotRecord};
use uuid::Uuid;

use crate::errors::StorageError;

/// One stored run. `payload` is the snapshot JSON with its tier/kind keys.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::market_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MarketSnapshotDB {
    pub run_id: String,
    pub created_at: NaiveDateTime,
    pub payload: String,
}

impl TryFrom<&SnapshotRecord> for MarketSnapshotDB {
    type Error = StorageError;

    fn try_from(record: &SnapshotRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            run_id: record.run_id.to_string(),
            created_at: record.created_at.naive_utc(),
            payload: serde_json::to_string(&record.snapshot)?,
        })
    }
}

impl TryFrom<MarketSnapshotDB> for SnapshotRecord {
    type Error = StorageError;

    fn try_from(db: MarketSnapshotDB) -> Result<Self, Self::Error> {
        let snapshot: MarketSnapshot = serde_json::from_str(&db.payload)?;
        Ok(Self {
            run_id: Uuid::parse_str(&db.run_id)?,
            created_at: db.created_at.and_utc(),
            snapshot,
        })
    }
}
