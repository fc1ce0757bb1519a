use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{DeckId, UserId};

/// Upper bound on a plausible single-session length.
const MAX_SESSION_SECS: u32 = 24 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionRecordError {
    #[error("session length {0}s exceeds the 24h ceiling")]
    ImplausibleLength(u32),
}

/// The three study encounters a deck supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudyMode {
    /// Multiple-choice over a shuffled deck subset, optionally timed.
    Challenge,
    /// Single-pass multiple-choice with externally generated questions.
    Quiz,
    /// Passive question/answer review.
    Flip,
}

impl StudyMode {
    /// True for the modes that score answers as correct/incorrect.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        !matches!(self, StudyMode::Flip)
    }
}

/// Append-only record of one finished study encounter.
///
/// A live session exists only in memory; on completion it is flattened into
/// this record plus a `Progress` update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySessionRecord {
    user_id: UserId,
    deck_id: DeckId,
    length_secs: u32,
    completed_at: DateTime<Utc>,
}

impl StudySessionRecord {
    /// Build a session record.
    ///
    /// # Errors
    ///
    /// Returns `SessionRecordError::ImplausibleLength` for lengths above 24h,
    /// which only arise from timer bookkeeping bugs.
    pub fn new(
        user_id: UserId,
        deck_id: DeckId,
        length_secs: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SessionRecordError> {
        if length_secs > MAX_SESSION_SECS {
            return Err(SessionRecordError::ImplausibleLength(length_secs));
        }
        Ok(Self {
            user_id,
            deck_id,
            length_secs,
            completed_at,
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
    pub fn length_secs(&self) -> u32 {
        self.length_secs
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}
