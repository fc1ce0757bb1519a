use async_trait::async_trait;
use sqlx::Row;

use study_core::model::{Deck, DeckId};

use super::SqliteRepository;
use super::mapping::{deck_id_from_i64, id_i64, map_card_row, ser};
use crate::repository::{DeckRepository, FlashcardRecord, StorageError};

#[async_trait]
impl DeckRepository for SqliteRepository {
    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        let deck_id = id_i64("deck_id", deck.id().value())?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query(
            r"
                INSERT INTO decks (id, name, description, created_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description
            ",
        )
        .bind(deck_id)
        .bind(deck.name())
        .bind(deck.description())
        .bind(deck.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        // Cards are replaced wholesale; their order is the deck order.
        sqlx::query("DELETE FROM flashcards WHERE deck_id = ?1")
            .bind(deck_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for (position, card) in deck.cards().iter().enumerate() {
            let record = FlashcardRecord::from_card(card);
            sqlx::query(
                r"
                    INSERT INTO flashcards (
                        id, deck_id, position, question, answer, image_url,
                        times_studied, correct_count, incorrect_count
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ",
            )
            .bind(id_i64("card_id", record.id.value())?)
            .bind(deck_id)
            .bind(i64::try_from(position).map_err(ser)?)
            .bind(&record.question)
            .bind(&record.answer)
            .bind(record.image.as_ref().map(|i| i.as_str().to_owned()))
            .bind(i64::from(record.times_studied))
            .bind(i64::from(record.correct_count))
            .bind(i64::from(record.incorrect_count))
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    async fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, StorageError> {
        let deck_id = id_i64("deck_id", id.value())?;

        let Some(deck_row) = sqlx::query(
            "SELECT id, name, description, created_at FROM decks WHERE id = ?1",
        )
        .bind(deck_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        else {
            return Ok(None);
        };

        let card_rows = sqlx::query(
            r"
                SELECT id, deck_id, question, answer, image_url,
                       times_studied, correct_count, incorrect_count
                FROM flashcards
                WHERE deck_id = ?1
                ORDER BY position ASC
            ",
        )
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut cards = Vec::with_capacity(card_rows.len());
        for row in &card_rows {
            cards.push(map_card_row(row)?);
        }

        let deck = Deck::new(
            deck_id_from_i64(deck_row.try_get::<i64, _>("id").map_err(ser)?)?,
            deck_row.try_get::<String, _>("name").map_err(ser)?,
            deck_row
                .try_get::<Option<String>, _>("description")
                .map_err(ser)?,
            cards,
            deck_row.try_get("created_at").map_err(ser)?,
        )
        .map_err(ser)?;

        Ok(Some(deck))
    }
}
