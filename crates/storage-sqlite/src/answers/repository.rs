use std::sync::Arc;

use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use tierfolio_core::profile::{UserAnswersSourceTrait, UserRiskProfile};
use tierfolio_core::Result;

use super::model::UserAnswersDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::user_answers;

pub struct AnswersRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AnswersRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AnswersRepository { pool, writer }
    }

    /// Stores or replaces the owner's answers.
    pub async fn save_answers(&self, owner_key: &str, profile: &UserRiskProfile) -> Result<()> {
        let row = UserAnswersDB::new(owner_key, profile)?;
        debug!("Storing answers for {}", row.owner_key);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::replace_into(user_answers::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}

impl UserAnswersSourceTrait for AnswersRepository {
    fn get(&self, owner_key: &str) -> Result<Option<UserRiskProfile>> {
        let mut conn = get_connection(&self.pool)?;
        let row = user_answers::table
            .find(owner_key)
            .select(UserAnswersDB::as_select())
            .first::<UserAnswersDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(row.map(UserRiskProfile::try_from).transpose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use tempfile::tempdir;
    use tierfolio_core::errors::{DatabaseError, Error};

    async fn create_test_repository() -> (AnswersRepository, Arc<DbPool>, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("answers.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (AnswersRepository::new(Arc::clone(&pool), writer), pool, temp_dir)
    }

    #[tokio::test]
    async fn test_answers_round_trip() {
        let (repo, _pool, _dir) = create_test_repository().await;
        assert!(repo.get("carol").unwrap().is_none());

        let profile = UserRiskProfile::new(&[2, 4, 0, 3]).unwrap();
        repo.save_answers("carol", &profile).await.unwrap();
        assert_eq!(repo.get("carol").unwrap(), Some(profile));

        let updated = UserRiskProfile::new(&[1, 1, 1, 1]).unwrap();
        repo.save_answers("carol", &updated).await.unwrap();
        assert_eq!(repo.get("carol").unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_corrupt_answers_are_reported() {
        let (repo, pool, _dir) = create_test_repository().await;
        let mut conn = get_connection(&pool).unwrap();
        diesel::sql_query(
            "INSERT INTO user_answers (owner_key, answers, updated_at) \
             VALUES ('dave', '[9, 9, 9, 9]', datetime('now'))",
        )
        .execute(&mut conn)
        .unwrap();

        assert!(matches!(
            repo.get("dave"),
            Err(Error::Database(DatabaseError::Serialization(_)))
        ));
    }
}
