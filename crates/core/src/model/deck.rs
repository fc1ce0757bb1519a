use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::card::Flashcard;
use crate::model::ids::{CardId, DeckId};

/// Minimum number of cards a deck needs before Challenge mode makes sense
/// (one correct answer plus three distinct distractors).
pub const MIN_CHALLENGE_CARDS: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck name cannot be empty")]
    EmptyName,

    #[error("card {card} does not belong to deck {deck}")]
    ForeignCard { deck: DeckId, card: CardId },
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// An ordered collection of flashcards.
///
/// Resolved once before a session starts and treated as read-only input by
/// the study engines.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    id: DeckId,
    name: String,
    description: Option<String>,
    cards: Vec<Flashcard>,
    created_at: DateTime<Utc>,
}

impl Deck {
    /// Create a deck with its cards.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyName` for a blank name and
    /// `DeckError::ForeignCard` when a card carries someone else's deck id.
    pub fn new(
        id: DeckId,
        name: impl Into<String>,
        description: Option<String>,
        cards: Vec<Flashcard>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DeckError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DeckError::EmptyName);
        }
        if let Some(card) = cards.iter().find(|c| c.deck_id() != id) {
            return Err(DeckError::ForeignCard {
                deck: id,
                card: card.id(),
            });
        }

        Ok(Self {
            id,
            name,
            description,
            cards,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> DeckId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Flashcard> {
        self.cards.iter().find(|c| c.id() == id)
    }

    /// True when the deck is large enough for multiple-choice play.
    #[must_use]
    pub fn supports_challenge(&self) -> bool {
        self.cards.len() >= MIN_CHALLENGE_CARDS
    }

    /// Answers of every card except `excluding`, deduplicated, in deck order.
    ///
    /// This is the distractor pool for the excluded card.
    #[must_use]
    pub fn other_answers(&self, excluding: CardId) -> Vec<&str> {
        let excluded_answer = self.card(excluding).map(Flashcard::answer);
        let mut seen = Vec::new();
        for card in &self.cards {
            if card.id() == excluding {
                continue;
            }
            let answer = card.answer();
            if Some(answer) == excluded_answer {
                continue;
            }
            if !seen.contains(&answer) {
                seen.push(answer);
            }
        }
        seen
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
