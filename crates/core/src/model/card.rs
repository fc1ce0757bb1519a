use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::{CardId, DeckId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("answer text cannot be empty")]
    EmptyAnswer,

    #[error("invalid question image url: {0}")]
    InvalidImageUrl(String),
}

//
// ─── IMAGE URL ─────────────────────────────────────────────────────────────────
//

/// Validated URL of an optional question image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Parse and validate an image URL.
    ///
    /// # Errors
    ///
    /// Returns `CardError::InvalidImageUrl` if the string is not an absolute URL.
    pub fn parse(raw: &str) -> Result<Self, CardError> {
        let url = Url::parse(raw).map_err(|e| CardError::InvalidImageUrl(e.to_string()))?;
        Ok(Self(url.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//
// ─── PERFORMANCE COUNTERS ──────────────────────────────────────────────────────
//

/// Per-user performance counters for one flashcard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStats {
    times_studied: u32,
    correct_count: u32,
    incorrect_count: u32,
}

impl CardStats {
    #[must_use]
    pub fn new(times_studied: u32, correct_count: u32, incorrect_count: u32) -> Self {
        Self {
            times_studied,
            correct_count,
            incorrect_count,
        }
    }

    #[must_use]
    pub fn times_studied(&self) -> u32 {
        self.times_studied
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    /// Fold one recorded answer into the counters.
    pub fn record_answer(&mut self, is_correct: bool) {
        self.times_studied = self.times_studied.saturating_add(1);
        if is_correct {
            self.correct_count = self.correct_count.saturating_add(1);
        } else {
            self.incorrect_count = self.incorrect_count.saturating_add(1);
        }
    }
}

//
// ─── FLASHCARD ─────────────────────────────────────────────────────────────────
//

/// A single question/answer pair owned by a deck.
///
/// Flashcards are immutable for the duration of a study session; counter
/// updates happen against a copy flushed back by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    id: CardId,
    deck_id: DeckId,
    question: String,
    answer: String,
    image: Option<ImageUrl>,
    stats: CardStats,
}

impl Flashcard {
    /// Create a flashcard, validating the question and answer text.
    ///
    /// # Errors
    ///
    /// Returns `CardError::EmptyQuestion` or `CardError::EmptyAnswer` if either
    /// side is blank after trimming.
    pub fn new(
        id: CardId,
        deck_id: DeckId,
        question: impl Into<String>,
        answer: impl Into<String>,
        image: Option<ImageUrl>,
    ) -> Result<Self, CardError> {
        let question = question.into();
        let answer = answer.into();
        if question.trim().is_empty() {
            return Err(CardError::EmptyQuestion);
        }
        if answer.trim().is_empty() {
            return Err(CardError::EmptyAnswer);
        }

        Ok(Self {
            id,
            deck_id,
            question,
            answer,
            image,
            stats: CardStats::default(),
        })
    }

    /// Rehydrate a flashcard from persisted storage, counters included.
    ///
    /// # Errors
    ///
    /// Returns `CardError` if the stored text fails validation.
    pub fn from_persisted(
        id: CardId,
        deck_id: DeckId,
        question: String,
        answer: String,
        image: Option<ImageUrl>,
        stats: CardStats,
    ) -> Result<Self, CardError> {
        let mut card = Self::new(id, deck_id, question, answer, image)?;
        card.stats = stats;
        Ok(card)
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageUrl> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> CardStats {
        self.stats
    }

    /// Record an answer against the per-card counters.
    pub fn record_answer(&mut self, is_correct: bool) {
        self.stats.record_answer(is_correct);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
