use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use study_core::model::{
    CardStats, DeckId, Flashcard, ImageUrl, Progress, StudySessionRecord, UserId,
};
use study_core::model::{CardError, CardId, Deck};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a flashcard.
///
/// Mirrors the domain `Flashcard` so repositories can serialize without
/// leaking storage concerns into the domain layer.
#[derive(Debug, Clone)]
pub struct FlashcardRecord {
    pub id: CardId,
    pub deck_id: DeckId,
    pub question: String,
    pub answer: String,
    pub image: Option<ImageUrl>,
    pub times_studied: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
}

impl FlashcardRecord {
    #[must_use]
    pub fn from_card(card: &Flashcard) -> Self {
        Self {
            id: card.id(),
            deck_id: card.deck_id(),
            question: card.question().to_owned(),
            answer: card.answer().to_owned(),
            image: card.image().cloned(),
            times_studied: card.stats().times_studied(),
            correct_count: card.stats().correct_count(),
            incorrect_count: card.stats().incorrect_count(),
        }
    }

    /// Convert the record back into a domain `Flashcard`.
    ///
    /// # Errors
    ///
    /// Returns `CardError` if the stored text fails validation.
    pub fn into_card(self) -> Result<Flashcard, CardError> {
        Flashcard::from_persisted(
            self.id,
            self.deck_id,
            self.question,
            self.answer,
            self.image,
            CardStats::new(self.times_studied, self.correct_count, self.incorrect_count),
        )
    }
}

/// Repository contract for decks and their cards.
#[async_trait]
pub trait DeckRepository: Send + Sync {
    /// Persist or update a deck, cards included.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the deck cannot be stored.
    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError>;

    /// Fetch a deck with its cards, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or mapping failures.
    async fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, StorageError>;
}

/// Repository contract for per-(user, deck) progress aggregates.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch progress, or `None` when the user has never studied this deck.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or mapping failures.
    async fn get_progress(
        &self,
        user_id: UserId,
        deck_id: DeckId,
    ) -> Result<Option<Progress>, StorageError>;

    /// Insert or overwrite the one progress row per (user, deck).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn upsert_progress(&self, progress: &Progress) -> Result<(), StorageError>;
}

/// Repository contract for the append-only session log.
#[async_trait]
pub trait StudySessionRepository: Send + Sync {
    /// Append one completed session, returning the new row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn append_session(&self, record: &StudySessionRecord) -> Result<i64, StorageError>;

    /// Sessions for a (user, deck), most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or mapping failures.
    async fn list_sessions(
        &self,
        user_id: UserId,
        deck_id: DeckId,
        limit: u32,
    ) -> Result<Vec<StudySessionRecord>, StorageError>;
}

/// In-memory repository for tests and prototyping.
///
/// Counts writes so idempotency tests can assert "exactly one" without
/// inspecting backend state.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    decks: Arc<Mutex<HashMap<DeckId, Deck>>>,
    progress: Arc<Mutex<HashMap<(UserId, DeckId), Progress>>>,
    sessions: Arc<Mutex<Vec<StudySessionRecord>>>,
    progress_writes: Arc<AtomicU32>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `upsert_progress` calls seen so far.
    #[must_use]
    pub fn progress_write_count(&self) -> u32 {
        self.progress_writes.load(Ordering::SeqCst)
    }

    /// Number of appended session records.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.lock().expect("sessions lock").len()
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl DeckRepository for InMemoryRepository {
    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        let mut guard = self.decks.lock().map_err(lock_err)?;
        guard.insert(deck.id(), deck.clone());
        Ok(())
    }

    async fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, StorageError> {
        let guard = self.decks.lock().map_err(lock_err)?;
        Ok(guard.get(&id).cloned())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(
        &self,
        user_id: UserId,
        deck_id: DeckId,
    ) -> Result<Option<Progress>, StorageError> {
        let guard = self.progress.lock().map_err(lock_err)?;
        Ok(guard.get(&(user_id, deck_id)).cloned())
    }

    async fn upsert_progress(&self, progress: &Progress) -> Result<(), StorageError> {
        let mut guard = self.progress.lock().map_err(lock_err)?;
        guard.insert(
            (progress.user_id(), progress.deck_id()),
            progress.clone(),
        );
        self.progress_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl StudySessionRepository for InMemoryRepository {
    async fn append_session(&self, record: &StudySessionRecord) -> Result<i64, StorageError> {
        let mut guard = self.sessions.lock().map_err(lock_err)?;
        guard.push(record.clone());
        i64::try_from(guard.len()).map_err(|_| StorageError::Conflict)
    }

    async fn list_sessions(
        &self,
        user_id: UserId,
        deck_id: DeckId,
        limit: u32,
    ) -> Result<Vec<StudySessionRecord>, StorageError> {
        let guard = self.sessions.lock().map_err(lock_err)?;
        let mut out: Vec<StudySessionRecord> = guard
            .iter()
            .filter(|s| s.user_id() == user_id && s.deck_id() == deck_id)
            .cloned()
            .collect();
        out.reverse();
        out.truncate(limit as usize);
        Ok(out)
    }
}

/// Aggregates the three repositories behind trait objects for backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub decks: Arc<dyn DeckRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub sessions: Arc<dyn StudySessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            decks: Arc::new(repo.clone()),
            progress: Arc::new(repo.clone()),
            sessions: Arc::new(repo),
        }
    }
}
