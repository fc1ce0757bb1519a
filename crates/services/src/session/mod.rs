mod engine;
mod mode;

pub use engine::{
    AdvanceOutcome, SessionItem, SessionOutcome, SessionView, StudySessionEngine,
};
pub use mode::{
    CHALLENGE_QUESTION_COUNT, CHALLENGE_TIME_LIMIT_SECS, ModeConfig, OPTIONS_PER_QUESTION,
};
