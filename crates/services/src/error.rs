//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use study_core::model::{DeckId, SessionRecordError};

/// Errors emitted by the quiz question source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz generation is not configured")]
    Disabled,
    #[error("quiz generator returned no questions")]
    EmptyResponse,
    #[error("quiz generator request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("quiz generator returned malformed questions: {0}")]
    Malformed(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by session construction and the study workflow.
///
/// `DeckNotFound` and `NotEnoughCards` are input errors: they are raised
/// before a session engine exists, so the state machine never sees them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("deck {0} not found")]
    DeckNotFound(DeckId),
    #[error("challenge mode needs {needed} cards, deck has {got}")]
    NotEnoughCards { needed: usize, got: usize },
    #[error("no cards available for session")]
    Empty,
    #[error("quiz source is not configured")]
    QuizUnavailable,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while persisting a finished session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Record(#[from] SessionRecordError),
}
