//! Entry point tying deck loading, the session engine and the save
//! pipeline together.
//!
//! Consumers resolve a session through [`StudyWorkflow`], drive the
//! returned [`ActiveStudySession`]'s engine with their own clock ticks and
//! user input, and hand the frozen outcome back for committing.

use std::sync::Arc;

use storage::repository::{
    DeckRepository, ProgressRepository, Storage, StudySessionRepository,
};
use study_core::Clock;
use study_core::model::{DeckId, Mastery, Progress, UserId};

use crate::error::SessionError;
use crate::persistence::{
    CacheInvalidator, NoopInvalidator, PersistenceCoordinator, SaveStatus,
};
use crate::quiz::QuizQuestionSource;
use crate::session::{CHALLENGE_QUESTION_COUNT, SessionOutcome, StudySessionEngine};

//
// ─── WORKFLOW ──────────────────────────────────────────────────────────────────
//

/// Long-lived service that starts study sessions against a storage backend.
#[derive(Clone)]
pub struct StudyWorkflow {
    clock: Clock,
    decks: Arc<dyn DeckRepository>,
    progress: Arc<dyn ProgressRepository>,
    sessions: Arc<dyn StudySessionRepository>,
    invalidator: Arc<dyn CacheInvalidator>,
    quiz_source: Option<Arc<dyn QuizQuestionSource>>,
}

impl StudyWorkflow {
    #[must_use]
    pub fn new(storage: Storage, clock: Clock) -> Self {
        Self {
            clock,
            decks: storage.decks,
            progress: storage.progress,
            sessions: storage.sessions,
            invalidator: Arc::new(NoopInvalidator),
            quiz_source: None,
        }
    }

    /// Attach a cache layer to notify after saves.
    #[must_use]
    pub fn with_invalidator(mut self, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        self.invalidator = invalidator;
        self
    }

    /// Attach a question generator, enabling Quiz mode.
    #[must_use]
    pub fn with_quiz_source(mut self, source: Arc<dyn QuizQuestionSource>) -> Self {
        self.quiz_source = Some(source);
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Start a Challenge session on a deck.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DeckNotFound` for an unknown deck,
    /// `SessionError::NotEnoughCards` below the four-card minimum, or a
    /// storage error.
    pub async fn start_challenge(
        &self,
        user_id: UserId,
        deck_id: DeckId,
        timed: bool,
    ) -> Result<ActiveStudySession, SessionError> {
        let (deck, progress) = self.load(user_id, deck_id).await?;
        let engine = StudySessionEngine::challenge(user_id, &deck, &progress, timed)?;
        Ok(self.activate(engine, deck_id))
    }

    /// Start a Quiz session from AI-generated questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuizUnavailable` when no enabled generator is
    /// attached, a `SessionError::Quiz` when generation fails, or the same
    /// deck and storage errors as the other modes.
    pub async fn start_quiz(
        &self,
        user_id: UserId,
        deck_id: DeckId,
    ) -> Result<ActiveStudySession, SessionError> {
        let source = self
            .quiz_source
            .as_ref()
            .filter(|s| s.enabled())
            .ok_or(SessionError::QuizUnavailable)?;

        let (deck, progress) = self.load(user_id, deck_id).await?;
        let questions = source
            .generate_questions(&deck, CHALLENGE_QUESTION_COUNT)
            .await?;
        let engine = StudySessionEngine::quiz(user_id, &deck, &progress, questions)?;
        Ok(self.activate(engine, deck_id))
    }

    /// Start a Flip session over the whole deck.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DeckNotFound` for an unknown deck,
    /// `SessionError::Empty` for a deck without cards, or a storage error.
    pub async fn start_flip(
        &self,
        user_id: UserId,
        deck_id: DeckId,
    ) -> Result<ActiveStudySession, SessionError> {
        let (deck, progress) = self.load(user_id, deck_id).await?;
        let engine = StudySessionEngine::flip(user_id, &deck, &progress)?;
        Ok(self.activate(engine, deck_id))
    }

    async fn load(
        &self,
        user_id: UserId,
        deck_id: DeckId,
    ) -> Result<(study_core::model::Deck, Progress), SessionError> {
        let deck = self
            .decks
            .get_deck(deck_id)
            .await?
            .ok_or(SessionError::DeckNotFound(deck_id))?;
        let progress = self
            .progress
            .get_progress(user_id, deck_id)
            .await?
            .unwrap_or_else(|| Progress::initial(user_id, deck_id));
        Ok((deck, progress))
    }

    fn activate(&self, engine: StudySessionEngine, deck_id: DeckId) -> ActiveStudySession {
        let saver = PersistenceCoordinator::new(
            Arc::clone(&self.progress),
            Arc::clone(&self.sessions),
            Arc::clone(&self.invalidator),
            vec![format!("/decks/{deck_id}"), "/library".to_owned()],
        );
        ActiveStudySession { engine, saver }
    }
}

//
// ─── ACTIVE SESSION ────────────────────────────────────────────────────────────
//

/// How a commit went. The session always reaches its results screen; `saved`
/// only tells whether the numbers on it were persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReport {
    pub saved: bool,
    pub mastery: Mastery,
}

/// One running session with its dedicated save coordinator.
pub struct ActiveStudySession {
    engine: StudySessionEngine,
    saver: PersistenceCoordinator,
}

impl std::fmt::Debug for ActiveStudySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveStudySession").finish_non_exhaustive()
    }
}

impl ActiveStudySession {
    #[must_use]
    pub fn engine(&self) -> &StudySessionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut StudySessionEngine {
        &mut self.engine
    }

    /// Commit a frozen outcome and move the engine to its results screen.
    ///
    /// Persistence failures are absorbed into the report: the session never
    /// strands on the saving screen because a write failed.
    pub async fn commit(&mut self, outcome: &SessionOutcome) -> CommitReport {
        let report = match self.saver.save(outcome).await {
            Ok(SaveStatus::Saved(mastery)) => CommitReport {
                saved: true,
                mastery,
            },
            Ok(SaveStatus::Dropped) => CommitReport {
                saved: self.saver.is_saved(),
                mastery: outcome.final_mastery(),
            },
            Err(_) => CommitReport {
                saved: false,
                mastery: outcome.final_mastery(),
            },
        };
        self.engine.finish_saving();
        report
    }

    /// End the session now and commit whatever was answered.
    ///
    /// `None` when the session already left the question loop.
    pub async fn end_early(
        &mut self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Option<CommitReport> {
        let outcome = self.engine.end_session(now)?;
        Some(self.commit(&outcome).await)
    }
}
