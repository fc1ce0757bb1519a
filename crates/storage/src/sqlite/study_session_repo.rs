use async_trait::async_trait;

use study_core::model::{DeckId, StudySessionRecord, UserId};

use super::SqliteRepository;
use super::mapping::{id_i64, map_session_row};
use crate::repository::{StorageError, StudySessionRepository};

#[async_trait]
impl StudySessionRepository for SqliteRepository {
    async fn append_session(&self, record: &StudySessionRecord) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO study_sessions (user_id, deck_id, length_secs, completed_at)
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(record.user_id().to_string())
        .bind(id_i64("deck_id", record.deck_id().value())?)
        .bind(i64::from(record.length_secs()))
        .bind(record.completed_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn list_sessions(
        &self,
        user_id: UserId,
        deck_id: DeckId,
        limit: u32,
    ) -> Result<Vec<StudySessionRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT user_id, deck_id, length_secs, completed_at
                FROM study_sessions
                WHERE user_id = ?1 AND deck_id = ?2
                ORDER BY completed_at DESC, id DESC
                LIMIT ?3
            ",
        )
        .bind(user_id.to_string())
        .bind(id_i64("deck_id", deck_id.value())?)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(map_session_row(row)?);
        }
        Ok(out)
    }
}
