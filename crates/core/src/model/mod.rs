mod card;
mod deck;
mod ids;
mod progress;
mod session;

pub use card::{CardError, CardStats, Flashcard, ImageUrl};
pub use deck::{Deck, DeckError, MIN_CHALLENGE_CARDS};
pub use ids::{CardId, DeckId, ParseIdError, UserId};
pub use progress::{Mastery, Progress, ProgressError};
pub use session::{SessionRecordError, StudyMode, StudySessionRecord};
