use chrono::Duration;

use study_core::model::StudyMode;
use study_core::timing::QuestionTimer;

/// Number of questions a Challenge session draws from the deck.
pub const CHALLENGE_QUESTION_COUNT: usize = 10;

/// Per-question countdown in timed Challenge play.
pub const CHALLENGE_TIME_LIMIT_SECS: i64 = 15;

/// Fixed size of a multiple-choice option set.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Per-mode knobs for the one shared session engine.
///
/// Mode differences (subset vs full deck, timer on/off, choices vs reveal)
/// live here so the engine itself stays a single state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeConfig {
    mode: StudyMode,
    options_per_question: usize,
    question_limit: Option<usize>,
    time_limit: Option<Duration>,
}

impl ModeConfig {
    /// Challenge: shuffled subset, multiple choice, optional 15s countdown.
    #[must_use]
    pub fn challenge(timed: bool) -> Self {
        Self {
            mode: StudyMode::Challenge,
            options_per_question: OPTIONS_PER_QUESTION,
            question_limit: Some(CHALLENGE_QUESTION_COUNT),
            time_limit: timed.then(|| Duration::seconds(CHALLENGE_TIME_LIMIT_SECS)),
        }
    }

    /// Quiz: externally generated questions, single pass, untimed.
    #[must_use]
    pub fn quiz() -> Self {
        Self {
            mode: StudyMode::Quiz,
            options_per_question: OPTIONS_PER_QUESTION,
            question_limit: None,
            time_limit: None,
        }
    }

    /// Flip: every card in deck order, reveal-only, untimed.
    #[must_use]
    pub fn flip() -> Self {
        Self {
            mode: StudyMode::Flip,
            options_per_question: 0,
            question_limit: None,
            time_limit: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    #[must_use]
    pub fn options_per_question(&self) -> usize {
        self.options_per_question
    }

    #[must_use]
    pub fn question_limit(&self) -> Option<usize> {
        self.question_limit
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.time_limit.is_some()
    }

    /// Build the question timer this mode calls for.
    #[must_use]
    pub fn question_timer(&self) -> QuestionTimer {
        match self.time_limit {
            Some(limit) => QuestionTimer::timed(limit),
            None => QuestionTimer::untimed(),
        }
    }

    /// True when the mode presents multiple-choice options.
    #[must_use]
    pub fn multiple_choice(&self) -> bool {
        self.options_per_question > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_config_honors_timed_flag() {
        assert!(ModeConfig::challenge(true).is_timed());
        assert!(!ModeConfig::challenge(false).is_timed());
        assert!(ModeConfig::challenge(true).multiple_choice());
    }

    #[test]
    fn quiz_is_untimed_multiple_choice() {
        let config = ModeConfig::quiz();
        assert!(!config.is_timed());
        assert!(config.multiple_choice());
        assert_eq!(config.question_limit(), None);
    }

    #[test]
    fn flip_has_no_options() {
        let config = ModeConfig::flip();
        assert!(!config.multiple_choice());
        assert!(!config.question_timer().is_timed());
    }
}
