use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use tierfolio_core::snapshot::{SnapshotRecord, SnapshotStoreTrait};
use tierfolio_core::Result;

use super::model::MarketSnapshotDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::market_snapshots;

/// Keeps exactly one snapshot: each save replaces the previous run in a
/// single transaction.
pub struct SnapshotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SnapshotRepository { pool, writer }
    }
}

#[async_trait]
impl SnapshotStoreTrait for SnapshotRepository {
    fn load(&self) -> Result<Option<SnapshotRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let row = market_snapshots::table
            .order(market_snapshots::created_at.desc())
            .select(MarketSnapshotDB::as_select())
            .first::<MarketSnapshotDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(row.map(SnapshotRecord::try_from).transpose()?)
    }

    async fn save(&self, record: &SnapshotRecord) -> Result<()> {
        let row = MarketSnapshotDB::try_from(record)?;
        debug!("Storing snapshot {} ({} bytes)", row.run_id, row.payload.len());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::delete(market_snapshots::table)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::insert_into(market_snapshots::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
