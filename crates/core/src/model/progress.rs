use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{DeckId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("mastery {0} is outside [0, 100]")]
    MasteryOutOfRange(u32),
}

//
// ─── MASTERY ───────────────────────────────────────────────────────────────────
//

/// Per-(user, deck) proficiency score, always within [0, 100].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Mastery(u8);

impl Mastery {
    pub const MIN: Mastery = Mastery(0);
    pub const MAX: Mastery = Mastery(100);

    /// Build a mastery value, rejecting anything above 100.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::MasteryOutOfRange` for values above 100.
    pub fn new(value: u32) -> Result<Self, ProgressError> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= 100)
            .map(Self)
            .ok_or(ProgressError::MasteryOutOfRange(value))
    }

    /// Build a mastery value, clamping into [0, 100].
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(value.clamp(0, 100) as u8)
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Apply a signed delta, saturating at the bounds.
    #[must_use]
    pub fn apply_delta(self, delta: i32) -> Self {
        Self::clamped(i64::from(self.0) + i64::from(delta))
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// The persisted aggregate a completed session writes back to.
///
/// One row per (user, deck); created on first save and overwritten by the
/// persistence coordinator thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    user_id: UserId,
    deck_id: DeckId,
    mastery: Mastery,
    completed_sessions: u32,
    challenge_completed: u32,
    last_studied: Option<DateTime<Utc>>,
}

impl Progress {
    /// Fresh progress for a deck the user has never studied.
    #[must_use]
    pub fn initial(user_id: UserId, deck_id: DeckId) -> Self {
        Self {
            user_id,
            deck_id,
            mastery: Mastery::MIN,
            completed_sessions: 0,
            challenge_completed: 0,
            last_studied: None,
        }
    }

    /// Rehydrate progress from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::MasteryOutOfRange` if the stored mastery is
    /// out of bounds.
    pub fn from_persisted(
        user_id: UserId,
        deck_id: DeckId,
        mastery: u32,
        completed_sessions: u32,
        challenge_completed: u32,
        last_studied: Option<DateTime<Utc>>,
    ) -> Result<Self, ProgressError> {
        Ok(Self {
            user_id,
            deck_id,
            mastery: Mastery::new(mastery)?,
            completed_sessions,
            challenge_completed,
            last_studied,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    #[must_use]
    pub fn mastery(&self) -> Mastery {
        self.mastery
    }

    #[must_use]
    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    #[must_use]
    pub fn challenge_completed(&self) -> u32 {
        self.challenge_completed
    }

    #[must_use]
    pub fn last_studied(&self) -> Option<DateTime<Utc>> {
        self.last_studied
    }

    /// Fold one completed session into the aggregate.
    ///
    /// `count_challenge` bumps the challenge counter in addition to the
    /// session counter.
    pub fn record_session(
        &mut self,
        mastery: Mastery,
        count_challenge: bool,
        studied_at: DateTime<Utc>,
    ) {
        self.mastery = mastery;
        self.completed_sessions = self.completed_sessions.saturating_add(1);
        if count_challenge {
            self.challenge_completed = self.challenge_completed.saturating_add(1);
        }
        self.last_studied = Some(studied_at);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
