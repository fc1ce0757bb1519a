use async_trait::async_trait;

use study_core::model::{DeckId, Progress, UserId};

use super::SqliteRepository;
use super::mapping::{id_i64, map_progress_row};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(
        &self,
        user_id: UserId,
        deck_id: DeckId,
    ) -> Result<Option<Progress>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT user_id, deck_id, mastery, completed_sessions,
                       challenge_completed, last_studied
                FROM progress
                WHERE user_id = ?1 AND deck_id = ?2
            ",
        )
        .bind(user_id.to_string())
        .bind(id_i64("deck_id", deck_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn upsert_progress(&self, progress: &Progress) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO progress (
                    user_id, deck_id, mastery, completed_sessions,
                    challenge_completed, last_studied
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(user_id, deck_id) DO UPDATE SET
                    mastery = excluded.mastery,
                    completed_sessions = excluded.completed_sessions,
                    challenge_completed = excluded.challenge_completed,
                    last_studied = excluded.last_studied
            ",
        )
        .bind(progress.user_id().to_string())
        .bind(id_i64("deck_id", progress.deck_id().value())?)
        .bind(i64::from(progress.mastery().value()))
        .bind(i64::from(progress.completed_sessions()))
        .bind(i64::from(progress.challenge_completed()))
        .bind(progress.last_studied())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
