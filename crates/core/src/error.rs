use thiserror::Error;

use crate::model::{CardError, DeckError, ProgressError, SessionRecordError};

/// Top-level domain error for callers that do not care which model failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    SessionRecord(#[from] SessionRecordError),
}
