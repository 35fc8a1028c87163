use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tierfolio_core::portfolio::{DraftStoreTrait, Portfolio};
use tierfolio_core::Result;

use super::model::PortfolioDraftDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::portfolio_drafts;
use crate::schema::portfolio_drafts::dsl::*;

pub struct DraftRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DraftRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        DraftRepository { pool, writer }
    }
}

#[async_trait]
impl DraftStoreTrait for DraftRepository {
    fn load(&self, key: &str) -> Result<Option<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;
        let row = portfolio_drafts
            .find(key)
            .select(PortfolioDraftDB::as_select())
            .first::<PortfolioDraftDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(row.map(Portfolio::try_from).transpose()?)
    }

    async fn save(&self, key: &str, portfolio: &Portfolio) -> Result<()> {
        let row = PortfolioDraftDB::new(key, portfolio)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::replace_into(portfolio_drafts::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn delete(&self, key: &str) -> Result<usize> {
        let key = key.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(portfolio_drafts.filter(owner_key.eq(key)))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
