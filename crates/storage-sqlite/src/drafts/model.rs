//! Database model for portfolio drafts.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use tierfolio_core::portfolio::Portfolio;

use crate::errors::StorageError;

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_drafts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDraftDB {
    pub owner_key: String,
    pub payload: String,
    pub updated_at: NaiveDateTime,
}

impl PortfolioDraftDB {
    pub fn new(owner_key: &str, portfolio: &Portfolio) -> Result<Self, StorageError> {
        Ok(Self {
            owner_key: owner_key.to_string(),
            payload: serde_json::to_string(portfolio)?,
            updated_at: Utc::now().naive_utc(),
        })
    }
}

impl TryFrom<PortfolioDraftDB> for Portfolio {
    type Error = StorageError;

    fn try_from(db: PortfolioDraftDB) -> Result<Self, Self::Error> {
        Ok(serde_json::from_str(&db.payload)?)
    }
}
