//! Session save pipeline.
//!
//! A finished session writes two things: the updated progress aggregate and
//! one row in the append-only session log. Several UI paths can race to
//! trigger the save (the completion screen, an unmount, a retry), so the
//! coordinator serializes them and guarantees the write happens at most
//! once per session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::{error, warn};

use storage::repository::{ProgressRepository, StudySessionRepository};
use study_core::model::{Mastery, Progress, StudyMode, StudySessionRecord};

use crate::error::PersistError;
use crate::session::SessionOutcome;

//
// ─── CACHE INVALIDATION ────────────────────────────────────────────────────────
//

/// Notifies interested consumers that data under a path went stale.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Invalidate whatever is cached under `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the notification could not be delivered. The
    /// save pipeline logs and swallows it; stale caches are recoverable.
    async fn invalidate(
        &self,
        path: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Invalidator for setups without a cache layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

#[async_trait]
impl CacheInvalidator for NoopInvalidator {
    async fn invalidate(
        &self,
        _path: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

//
// ─── COORDINATOR ───────────────────────────────────────────────────────────────
//

/// What `save` did with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// The write went through; carries the persisted mastery.
    Saved(Mastery),
    /// Another save is in flight or already succeeded; nothing was written.
    Dropped,
}

/// One coordinator per session, guarding its single save.
///
/// Duplicate triggers are dropped rather than queued: the first caller to
/// flip the in-flight flag performs the write, everyone else gets
/// [`SaveStatus::Dropped`]. After one success every later call is dropped
/// too, so retrying a button cannot double-count a session.
pub struct PersistenceCoordinator {
    progress: Arc<dyn ProgressRepository>,
    sessions: Arc<dyn StudySessionRepository>,
    invalidator: Arc<dyn CacheInvalidator>,
    stale_paths: Vec<String>,
    in_flight: AtomicBool,
    saved: AtomicBool,
}

impl PersistenceCoordinator {
    #[must_use]
    pub fn new(
        progress: Arc<dyn ProgressRepository>,
        sessions: Arc<dyn StudySessionRepository>,
        invalidator: Arc<dyn CacheInvalidator>,
        stale_paths: Vec<String>,
    ) -> Self {
        Self {
            progress,
            sessions,
            invalidator,
            stale_paths,
            in_flight: AtomicBool::new(false),
            saved: AtomicBool::new(false),
        }
    }

    /// True once a save has gone through.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.saved.load(Ordering::SeqCst)
    }

    /// Persist the outcome, at most once.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` when the progress or session write fails. The
    /// in-flight flag is released on failure, so one retry is possible;
    /// callers should still move the session to its results screen whatever
    /// this returns.
    pub async fn save(&self, outcome: &SessionOutcome) -> Result<SaveStatus, PersistError> {
        if self.saved.load(Ordering::SeqCst) {
            return Ok(SaveStatus::Dropped);
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Ok(SaveStatus::Dropped);
        }

        let result = self.save_inner(outcome).await;
        self.in_flight.store(false, Ordering::SeqCst);

        match result {
            Ok(mastery) => {
                self.saved.store(true, Ordering::SeqCst);
                Ok(SaveStatus::Saved(mastery))
            }
            Err(err) => {
                error!(
                    deck = %outcome.deck_id,
                    mode = ?outcome.mode,
                    %err,
                    "session save failed"
                );
                Err(err)
            }
        }
    }

    async fn save_inner(&self, outcome: &SessionOutcome) -> Result<Mastery, PersistError> {
        // Validate the log record up front so a rejected outcome leaves no
        // half-applied progress behind.
        let length_secs = u32::try_from(outcome.study_secs).unwrap_or(u32::MAX);
        let record = StudySessionRecord::new(
            outcome.user_id,
            outcome.deck_id,
            length_secs,
            outcome.completed_at,
        )?;

        let mut progress = self
            .progress
            .get_progress(outcome.user_id, outcome.deck_id)
            .await?
            .unwrap_or_else(|| Progress::initial(outcome.user_id, outcome.deck_id));

        // Mastery builds on the value captured when the session started, so
        // a concurrent write to the row cannot skew the delta.
        let mastery = outcome.final_mastery();
        let counts_challenge = outcome.mode == StudyMode::Challenge && !outcome.ended_early;
        progress.record_session(mastery, counts_challenge, outcome.completed_at);
        self.progress.upsert_progress(&progress).await?;

        self.sessions.append_session(&record).await?;

        for path in &self.stale_paths {
            if let Err(err) = self.invalidator.invalidate(path).await {
                warn!(path, %err, "cache invalidation failed");
            }
        }

        Ok(mastery)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use storage::repository::InMemoryRepository;
    use study_core::model::{DeckId, UserId};
    use study_core::time::fixed_now;

    fn outcome(mode: StudyMode, correct: u32, incorrect: u32, ended_early: bool) -> SessionOutcome {
        SessionOutcome {
            mode,
            user_id: UserId::random(),
            deck_id: DeckId::new(1),
            initial_mastery: Mastery::new(10).unwrap(),
            correct,
            incorrect,
            answered: HashMap::new(),
            study_secs: 120,
            completed_at: fixed_now(),
            ended_early,
        }
    }

    fn coordinator(repo: &InMemoryRepository) -> PersistenceCoordinator {
        PersistenceCoordinator::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(NoopInvalidator),
            vec!["/decks/1".into(), "/library".into()],
        )
    }

    #[tokio::test]
    async fn save_writes_progress_and_session_once() {
        let repo = InMemoryRepository::new();
        let coordinator = coordinator(&repo);
        let outcome = outcome(StudyMode::Challenge, 8, 2, false);

        let status = coordinator.save(&outcome).await.unwrap();
        assert_eq!(status, SaveStatus::Saved(Mastery::new(16).unwrap()));
        assert!(coordinator.is_saved());

        let progress = repo
            .get_progress(outcome.user_id, outcome.deck_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(progress.mastery().value(), 16);
        assert_eq!(progress.completed_sessions(), 1);
        assert_eq!(progress.challenge_completed(), 1);
        assert_eq!(progress.last_studied(), Some(fixed_now()));
        assert_eq!(repo.session_count(), 1);
    }

    #[tokio::test]
    async fn second_save_is_dropped() {
        let repo = InMemoryRepository::new();
        let coordinator = coordinator(&repo);
        let outcome = outcome(StudyMode::Quiz, 3, 1, false);

        assert!(matches!(
            coordinator.save(&outcome).await.unwrap(),
            SaveStatus::Saved(_)
        ));
        assert_eq!(coordinator.save(&outcome).await.unwrap(), SaveStatus::Dropped);

        assert_eq!(repo.progress_write_count(), 1);
        assert_eq!(repo.session_count(), 1);
    }

    #[tokio::test]
    async fn early_end_does_not_count_a_challenge() {
        let repo = InMemoryRepository::new();
        let coordinator = coordinator(&repo);
        let outcome = outcome(StudyMode::Challenge, 2, 0, true);

        coordinator.save(&outcome).await.unwrap();

        let progress = repo
            .get_progress(outcome.user_id, outcome.deck_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(progress.completed_sessions(), 1);
        assert_eq!(progress.challenge_completed(), 0);
        assert_eq!(progress.mastery().value(), 12);
    }

    #[tokio::test]
    async fn flip_save_uses_the_time_based_formula() {
        let repo = InMemoryRepository::new();
        let coordinator = coordinator(&repo);
        let mut outcome = outcome(StudyMode::Flip, 0, 0, false);
        outcome.study_secs = 600;

        let status = coordinator.save(&outcome).await.unwrap();
        // Ten minutes on top of mastery 10.
        assert_eq!(status, SaveStatus::Saved(Mastery::new(20).unwrap()));
    }

    #[tokio::test]
    async fn failed_invalidation_does_not_fail_the_save() {
        struct FailingInvalidator;

        #[async_trait]
        impl CacheInvalidator for FailingInvalidator {
            async fn invalidate(
                &self,
                _path: &str,
            ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
                Err("cache offline".into())
            }
        }

        let repo = InMemoryRepository::new();
        let coordinator = PersistenceCoordinator::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(FailingInvalidator),
            vec!["/library".into()],
        );

        let outcome = outcome(StudyMode::Quiz, 1, 0, false);
        assert!(matches!(
            coordinator.save(&outcome).await.unwrap(),
            SaveStatus::Saved(_)
        ));
        assert_eq!(repo.session_count(), 1);
    }

    #[tokio::test]
    async fn implausible_length_is_rejected_before_any_log_write() {
        let repo = InMemoryRepository::new();
        let coordinator = coordinator(&repo);
        let mut outcome = outcome(StudyMode::Quiz, 1, 0, false);
        outcome.study_secs = u64::from(u32::MAX);

        let err = coordinator.save(&outcome).await.unwrap_err();
        assert!(matches!(err, PersistError::Record(_)));
        assert!(!coordinator.is_saved());
        assert_eq!(repo.progress_write_count(), 0);
        assert_eq!(repo.session_count(), 0);
    }
}
