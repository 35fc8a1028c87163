//! Database model for questionnaire answers.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use tierfolio_core::profile::UserRiskProfile;

use crate::errors::StorageError;

/// `answers` holds the four grades as a JSON array.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::user_answers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserAnswersDB {
    pub owner_key: String,
    pub answers: String,
    pub updated_at: NaiveDateTime,
}

impl UserAnswersDB {
    pub fn new(owner_key: &str, profile: &UserRiskProfile) -> Result<Self, StorageError> {
        Ok(Self {
            owner_key: owner_key.to_string(),
            answers: serde_json::to_string(profile)?,
            updated_at: Utc::now().naive_utc(),
        })
    }
}

impl TryFrom<UserAnswersDB> for UserRiskProfile {
    type Error = StorageError;

    fn try_from(db: UserAnswersDB) -> Result<Self, Self::Error> {
        Ok(serde_json::from_str(&db.answers)?)
    }
}
