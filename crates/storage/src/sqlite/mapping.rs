use sqlx::Row;

use study_core::model::{
    CardId, CardStats, DeckId, Flashcard, ImageUrl, Progress, StudySessionRecord, UserId,
};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn deck_id_from_i64(v: i64) -> Result<DeckId, StorageError> {
    Ok(DeckId::new(i64_to_u64("deck_id", v)?))
}

pub(crate) fn card_id_from_i64(v: i64) -> Result<CardId, StorageError> {
    Ok(CardId::new(i64_to_u64("card_id", v)?))
}

// User ids are stored as hyphenated UUID text to keep rows greppable.
pub(crate) fn user_id_from_str(s: &str) -> Result<UserId, StorageError> {
    s.parse::<UserId>().map_err(ser)
}

pub(crate) fn map_card_row(row: &sqlx::sqlite::SqliteRow) -> Result<Flashcard, StorageError> {
    let id = card_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let deck_id = deck_id_from_i64(row.try_get::<i64, _>("deck_id").map_err(ser)?)?;
    let question: String = row.try_get("question").map_err(ser)?;
    let answer: String = row.try_get("answer").map_err(ser)?;
    let image = row
        .try_get::<Option<String>, _>("image_url")
        .map_err(ser)?
        .map(|raw| ImageUrl::parse(&raw))
        .transpose()
        .map_err(ser)?;

    let stats = CardStats::new(
        i64_to_u32(
            "times_studied",
            row.try_get::<i64, _>("times_studied").map_err(ser)?,
        )?,
        i64_to_u32(
            "correct_count",
            row.try_get::<i64, _>("correct_count").map_err(ser)?,
        )?,
        i64_to_u32(
            "incorrect_count",
            row.try_get::<i64, _>("incorrect_count").map_err(ser)?,
        )?,
    );

    Flashcard::from_persisted(id, deck_id, question, answer, image, stats).map_err(ser)
}

pub(crate) fn map_progress_row(row: &sqlx::sqlite::SqliteRow) -> Result<Progress, StorageError> {
    let user_id = user_id_from_str(&row.try_get::<String, _>("user_id").map_err(ser)?)?;
    let deck_id = deck_id_from_i64(row.try_get::<i64, _>("deck_id").map_err(ser)?)?;
    let mastery = i64_to_u32("mastery", row.try_get::<i64, _>("mastery").map_err(ser)?)?;
    let completed_sessions = i64_to_u32(
        "completed_sessions",
        row.try_get::<i64, _>("completed_sessions").map_err(ser)?,
    )?;
    let challenge_completed = i64_to_u32(
        "challenge_completed",
        row.try_get::<i64, _>("challenge_completed").map_err(ser)?,
    )?;
    let last_studied = row.try_get("last_studied").map_err(ser)?;

    Progress::from_persisted(
        user_id,
        deck_id,
        mastery,
        completed_sessions,
        challenge_completed,
        last_studied,
    )
    .map_err(ser)
}

pub(crate) fn map_session_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<StudySessionRecord, StorageError> {
    let user_id = user_id_from_str(&row.try_get::<String, _>("user_id").map_err(ser)?)?;
    let deck_id = deck_id_from_i64(row.try_get::<i64, _>("deck_id").map_err(ser)?)?;
    let length_secs = i64_to_u32(
        "length_secs",
        row.try_get::<i64, _>("length_secs").map_err(ser)?,
    )?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;

    StudySessionRecord::new(user_id, deck_id, length_secs, completed_at).map_err(ser)
}
