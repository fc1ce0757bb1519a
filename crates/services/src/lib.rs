#![forbid(unsafe_code)]

pub mod distractor;
pub mod error;
pub mod persistence;
pub mod quiz;
pub mod selector;
pub mod session;
pub mod workflow;

pub use study_core::Clock;

pub use distractor::AnswerOption;
pub use error::{PersistError, QuizError, SessionError};
pub use persistence::{CacheInvalidator, NoopInvalidator, PersistenceCoordinator, SaveStatus};
pub use quiz::{HttpQuizGenerator, QuizGeneratorConfig, QuizQuestion, QuizQuestionSource};
pub use selector::CardSelector;
pub use session::{
    AdvanceOutcome, ModeConfig, SessionOutcome, SessionView, StudySessionEngine,
};
pub use workflow::{ActiveStudySession, CommitReport, StudyWorkflow};
