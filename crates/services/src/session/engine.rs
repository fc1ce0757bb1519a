use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::fmt;

use study_core::mastery::new_mastery;
use study_core::model::{
    CardId, Deck, DeckId, ImageUrl, Mastery, Progress, StudyMode, UserId,
};
use study_core::timing::{QuestionTimer, StudyClock};

use crate::distractor::{self, AnswerOption};
use crate::error::SessionError;
use crate::quiz::QuizQuestion;
use crate::selector::CardSelector;
use crate::session::mode::ModeConfig;

//
// ─── VIEWS ─────────────────────────────────────────────────────────────────────
//

/// The screens a session moves through.
///
/// `Question` covers both the prompt and the revealed answer; the two are
/// distinguished by the engine's `show_answer` flag since they share the
/// same card and option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionView {
    Settings,
    Question,
    Saving,
    FinalResults,
}

//
// ─── ITEMS ─────────────────────────────────────────────────────────────────────
//

/// One question of the session, whatever its origin.
///
/// Challenge and Flip items come from deck cards; Quiz items carry the
/// options the external generator supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionItem {
    card_id: CardId,
    question: String,
    answer: String,
    image: Option<ImageUrl>,
    preset_options: Option<Vec<String>>,
}

impl SessionItem {
    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.card_id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageUrl> {
        self.image.as_ref()
    }
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Counters frozen at the instant a session left the question loop.
///
/// Built synchronously, before any persistence await, so no timer tick can
/// land between freezing the values and using them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub mode: StudyMode,
    pub user_id: UserId,
    pub deck_id: DeckId,
    pub initial_mastery: Mastery,
    pub correct: u32,
    pub incorrect: u32,
    pub answered: HashMap<CardId, bool>,
    pub study_secs: u64,
    pub completed_at: DateTime<Utc>,
    pub ended_early: bool,
}

impl SessionOutcome {
    /// Mastery this session leaves behind, per the mode's formula.
    #[must_use]
    pub fn final_mastery(&self) -> Mastery {
        new_mastery(
            self.mode,
            self.initial_mastery,
            self.correct,
            self.incorrect,
            self.study_secs,
        )
    }
}

/// What `advance` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The call was invalid in the current state and changed nothing.
    Stayed,
    /// Moved to the next question.
    NextQuestion,
    /// That was the last card; timers are stopped and the outcome frozen.
    Complete(SessionOutcome),
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// The state machine behind one study encounter.
///
/// One engine serves all three modes; differences are confined to its
/// [`ModeConfig`]. All methods are synchronous and take `now` explicitly —
/// persistence happens outside, driven by the frozen [`SessionOutcome`].
pub struct StudySessionEngine {
    config: ModeConfig,
    user_id: UserId,
    deck: Deck,
    initial_mastery: Mastery,
    items: Vec<SessionItem>,
    rng: StdRng,
    view: SessionView,
    show_answer: bool,
    index: usize,
    correct: u32,
    incorrect: u32,
    answered: HashMap<CardId, bool>,
    options: Vec<AnswerOption>,
    clock: StudyClock,
    timer: QuestionTimer,
}

impl StudySessionEngine {
    /// Challenge session over a shuffled deck subset.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotEnoughCards` when the deck is below the
    /// four-card minimum.
    pub fn challenge(
        user_id: UserId,
        deck: &Deck,
        progress: &Progress,
        timed: bool,
    ) -> Result<Self, SessionError> {
        Self::challenge_with_rng(user_id, deck, progress, timed, StdRng::from_os_rng())
    }

    /// Challenge session with an injected random source, for deterministic
    /// selection and option shuffling.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotEnoughCards` when the deck is below the
    /// four-card minimum.
    pub fn challenge_with_rng(
        user_id: UserId,
        deck: &Deck,
        progress: &Progress,
        timed: bool,
        mut rng: StdRng,
    ) -> Result<Self, SessionError> {
        if !deck.supports_challenge() {
            return Err(SessionError::NotEnoughCards {
                needed: study_core::model::MIN_CHALLENGE_CARDS,
                got: deck.card_count(),
            });
        }

        let config = ModeConfig::challenge(timed);
        let limit = config.question_limit().unwrap_or(usize::MAX);
        let selector = CardSelector::challenge_subset(deck, limit, &mut rng);
        let items = selector
            .cards()
            .iter()
            .map(|card| SessionItem {
                card_id: card.id(),
                question: card.question().to_owned(),
                answer: card.answer().to_owned(),
                image: card.image().cloned(),
                preset_options: None,
            })
            .collect();

        Ok(Self::assemble(config, user_id, deck, progress, items, rng))
    }

    /// Quiz session from externally generated questions.
    ///
    /// The options of each question are taken as-is, except that a missing
    /// answer text is patched in so every question has a correct choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when no questions were supplied.
    pub fn quiz(
        user_id: UserId,
        deck: &Deck,
        progress: &Progress,
        questions: Vec<QuizQuestion>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let items = questions
            .into_iter()
            .map(|q| {
                let mut options = q.options;
                if !options.iter().any(|o| o == &q.answer) {
                    if options.is_empty() {
                        options.push(q.answer.clone());
                    } else {
                        let last = options.len() - 1;
                        options[last] = q.answer.clone();
                    }
                }
                SessionItem {
                    card_id: q.id,
                    question: q.question,
                    answer: q.answer,
                    image: None,
                    preset_options: Some(options),
                }
            })
            .collect();

        Ok(Self::assemble(
            ModeConfig::quiz(),
            user_id,
            deck,
            progress,
            items,
            StdRng::from_os_rng(),
        ))
    }

    /// Flip session over the whole deck in order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` for a deck without cards.
    pub fn flip(
        user_id: UserId,
        deck: &Deck,
        progress: &Progress,
    ) -> Result<Self, SessionError> {
        if deck.card_count() == 0 {
            return Err(SessionError::Empty);
        }

        let items = CardSelector::full_deck(deck)
            .cards()
            .iter()
            .map(|card| SessionItem {
                card_id: card.id(),
                question: card.question().to_owned(),
                answer: card.answer().to_owned(),
                image: card.image().cloned(),
                preset_options: None,
            })
            .collect();

        Ok(Self::assemble(
            ModeConfig::flip(),
            user_id,
            deck,
            progress,
            items,
            StdRng::from_os_rng(),
        ))
    }

    fn assemble(
        config: ModeConfig,
        user_id: UserId,
        deck: &Deck,
        progress: &Progress,
        items: Vec<SessionItem>,
        rng: StdRng,
    ) -> Self {
        let timer = config.question_timer();
        Self {
            config,
            user_id,
            deck: deck.clone(),
            initial_mastery: progress.mastery(),
            items,
            rng,
            view: SessionView::Settings,
            show_answer: false,
            index: 0,
            correct: 0,
            incorrect: 0,
            answered: HashMap::new(),
            options: Vec::new(),
            clock: StudyClock::new(),
            timer,
        }
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn mode(&self) -> StudyMode {
        self.config.mode()
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        self.view
    }

    #[must_use]
    pub fn show_answer(&self) -> bool {
        self.show_answer
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&SessionItem> {
        self.items.get(self.index)
    }

    /// The fixed option set of the current question.
    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answered.len()
    }

    #[must_use]
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.index
    }

    /// Cumulative study seconds, the 1 Hz consumer-visible value.
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        self.clock.elapsed_secs(now)
    }

    /// Seconds left on the current question, `None` when untimed or idle.
    #[must_use]
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<u64> {
        self.timer.remaining_secs(now)
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────
    //

    /// Leave the settings screen: start the study clock and present the
    /// first question.
    pub fn begin(&mut self, now: DateTime<Utc>) {
        if self.view != SessionView::Settings {
            return;
        }
        self.clock.start(now);
        self.view = SessionView::Question;
        self.present_question(now);
    }

    /// Record the user's choice for the current question.
    ///
    /// Returns the recorded correctness, or `None` when the call was
    /// ignored: answer already shown, card already answered, option index
    /// out of range, or a mode without options. Ignoring instead of erroring
    /// makes a double-click harmless. Recording disarms the countdown, so a
    /// tick arriving on the same instant cannot score the card again.
    pub fn handle_answer(&mut self, option_index: usize) -> Option<bool> {
        if self.view != SessionView::Question || self.show_answer {
            return None;
        }
        let item = self.items.get(self.index)?;
        if self.answered.contains_key(&item.card_id) {
            return None;
        }
        let is_correct = self.options.get(option_index)?.is_correct;
        let card_id = item.card_id;

        self.record_answer(card_id, is_correct);
        Some(is_correct)
    }

    /// Poll the question countdown.
    ///
    /// Returns `true` when the limit elapsed and a forced incorrect answer
    /// was recorded. An expiry after the card was answered is a no-op: the
    /// timer is disarmed the instant an answer lands, and the answered map
    /// guards the race where both happen on the same tick.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.view != SessionView::Question {
            return false;
        }
        if !self.timer.poll(now) {
            return false;
        }
        let Some(item) = self.items.get(self.index) else {
            return false;
        };
        if self.answered.contains_key(&item.card_id) {
            return false;
        }

        self.record_answer(item.card_id, false);
        true
    }

    /// Reveal the answer in Flip mode.
    pub fn reveal(&mut self) {
        if self.view == SessionView::Question && !self.config.multiple_choice() {
            self.show_answer = true;
        }
    }

    /// Move on from the current card.
    ///
    /// Advancing mid-question is refused in choice modes; after the last
    /// card both timers are stopped synchronously and the frozen outcome is
    /// handed back for saving.
    pub fn advance(&mut self, now: DateTime<Utc>) -> AdvanceOutcome {
        if self.view != SessionView::Question {
            return AdvanceOutcome::Stayed;
        }
        if self.config.multiple_choice() && !self.show_answer {
            return AdvanceOutcome::Stayed;
        }

        if self.index + 1 < self.items.len() {
            self.index += 1;
            self.show_answer = false;
            self.present_question(now);
            return AdvanceOutcome::NextQuestion;
        }

        AdvanceOutcome::Complete(self.freeze(now, false))
    }

    /// End the session early, committing whatever progress exists.
    ///
    /// Stop-and-commit, not abort: returns the frozen partial outcome.
    /// `None` once the session already left the question loop.
    pub fn end_session(&mut self, now: DateTime<Utc>) -> Option<SessionOutcome> {
        match self.view {
            SessionView::Settings | SessionView::Question => Some(self.freeze(now, true)),
            SessionView::Saving | SessionView::FinalResults => None,
        }
    }

    /// Leave the saving screen. Called after the save attempt, success or
    /// not, so a persistence failure never traps the session on a spinner.
    pub fn finish_saving(&mut self) {
        if self.view == SessionView::Saving {
            self.view = SessionView::FinalResults;
        }
    }

    //
    // ─── INTERNAL ──────────────────────────────────────────────────────────
    //

    fn record_answer(&mut self, card_id: CardId, is_correct: bool) {
        self.answered.insert(card_id, is_correct);
        if is_correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.timer.disarm();
        self.show_answer = true;
    }

    /// Regenerate options and re-arm the timer, once per new question.
    fn present_question(&mut self, now: DateTime<Utc>) {
        self.options = match self.items.get(self.index) {
            Some(item) if self.config.multiple_choice() => match &item.preset_options {
                Some(preset) => preset_options(preset, &item.answer),
                None => match self.deck.card(item.card_id) {
                    Some(card) => distractor::generate(
                        card,
                        &self.deck,
                        self.config.options_per_question(),
                        &mut self.rng,
                    ),
                    None => Vec::new(),
                },
            },
            _ => Vec::new(),
        };
        self.timer.arm(now);
    }

    // Both timers stop before the outcome is built; no tick can land
    // between freeze and use.
    fn freeze(&mut self, now: DateTime<Utc>, ended_early: bool) -> SessionOutcome {
        self.timer.disarm();
        self.clock.stop(now);
        self.view = SessionView::Saving;

        SessionOutcome {
            mode: self.config.mode(),
            user_id: self.user_id,
            deck_id: self.deck.id(),
            initial_mastery: self.initial_mastery,
            correct: self.correct,
            incorrect: self.incorrect,
            answered: self.answered.clone(),
            study_secs: self.clock.elapsed_secs(now),
            completed_at: now,
            ended_early,
        }
    }
}

/// Externally supplied options: the first entry matching the answer is the
/// correct one.
fn preset_options(preset: &[String], answer: &str) -> Vec<AnswerOption> {
    let mut found = false;
    preset
        .iter()
        .map(|text| {
            let is_correct = !found && text == answer;
            found |= is_correct;
            AnswerOption {
                text: text.clone(),
                is_correct,
            }
        })
        .collect()
}

impl fmt::Debug for StudySessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudySessionEngine")
            .field("mode", &self.config.mode())
            .field("deck_id", &self.deck.id())
            .field("view", &self.view)
            .field("index", &self.index)
            .field("items_len", &self.items.len())
            .field("correct", &self.correct)
            .field("incorrect", &self.incorrect)
            .field("show_answer", &self.show_answer)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use study_core::time::fixed_now;

    fn build_deck(cards: usize) -> Deck {
        let deck_id = DeckId::new(1);
        let cards = (1..=cards as u64)
            .map(|n| {
                study_core::model::Flashcard::new(
                    CardId::new(n),
                    deck_id,
                    format!("Q{n}"),
                    format!("A{n}"),
                    None,
                )
                .unwrap()
            })
            .collect();
        Deck::new(deck_id, "Deck", None, cards, fixed_now()).unwrap()
    }

    fn progress_at(mastery: u32, deck: &Deck) -> Progress {
        Progress::from_persisted(UserId::random(), deck.id(), mastery, 0, 0, None).unwrap()
    }

    fn challenge(deck: &Deck, progress: &Progress, timed: bool) -> StudySessionEngine {
        StudySessionEngine::challenge_with_rng(
            progress.user_id(),
            deck,
            progress,
            timed,
            StdRng::seed_from_u64(42),
        )
        .unwrap()
    }

    fn answer_correctly(engine: &mut StudySessionEngine) {
        let idx = engine
            .options()
            .iter()
            .position(|o| o.is_correct)
            .expect("option set has a correct entry");
        assert_eq!(engine.handle_answer(idx), Some(true));
    }

    #[test]
    fn challenge_requires_four_cards() {
        let deck = build_deck(3);
        let progress = progress_at(0, &deck);
        let err = StudySessionEngine::challenge(progress.user_id(), &deck, &progress, false)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::NotEnoughCards { needed: 4, got: 3 }
        ));
    }

    #[test]
    fn win_streak_completes_with_full_score() {
        let deck = build_deck(4);
        let progress = progress_at(10, &deck);
        let mut engine = challenge(&deck, &progress, false);
        let mut now = fixed_now();

        engine.begin(now);
        assert_eq!(engine.view(), SessionView::Question);
        assert_eq!(engine.total_items(), 4);

        let outcome = loop {
            answer_correctly(&mut engine);
            now += Duration::seconds(5);
            match engine.advance(now) {
                AdvanceOutcome::NextQuestion => {}
                AdvanceOutcome::Complete(outcome) => break outcome,
                AdvanceOutcome::Stayed => panic!("advance refused after answer"),
            }
        };

        assert_eq!(outcome.correct, 4);
        assert_eq!(outcome.incorrect, 0);
        assert!(!outcome.ended_early);
        assert_eq!(outcome.final_mastery().value(), 14);
        assert_eq!(engine.view(), SessionView::Saving);

        engine.finish_saving();
        assert_eq!(engine.view(), SessionView::FinalResults);
    }

    #[test]
    fn time_up_records_forced_incorrect() {
        let deck = build_deck(4);
        let progress = progress_at(0, &deck);
        let mut engine = challenge(&deck, &progress, true);
        let t0 = fixed_now();

        engine.begin(t0);
        assert_eq!(engine.remaining_secs(t0), Some(15));
        assert!(!engine.tick(t0 + Duration::seconds(14)));

        assert!(engine.tick(t0 + Duration::seconds(15)));
        assert_eq!(engine.incorrect_answers(), 1);
        assert!(engine.show_answer());

        // The expiry fired once and only once.
        assert!(!engine.tick(t0 + Duration::seconds(16)));
        assert_eq!(engine.incorrect_answers(), 1);
    }

    #[test]
    fn expiry_after_answer_never_mutates_the_score() {
        let deck = build_deck(4);
        let progress = progress_at(0, &deck);
        let mut engine = challenge(&deck, &progress, true);
        let t0 = fixed_now();

        engine.begin(t0);
        answer_correctly(&mut engine);

        assert!(!engine.tick(t0 + Duration::seconds(15)));
        assert_eq!(engine.correct_answers(), 1);
        assert_eq!(engine.incorrect_answers(), 0);
    }

    #[test]
    fn double_answer_is_a_no_op() {
        let deck = build_deck(4);
        let progress = progress_at(0, &deck);
        let mut engine = challenge(&deck, &progress, false);
        let now = fixed_now();

        engine.begin(now);
        let wrong = engine
            .options()
            .iter()
            .position(|o| !o.is_correct)
            .unwrap();
        answer_correctly(&mut engine);

        assert_eq!(engine.handle_answer(wrong), None);
        assert_eq!(engine.correct_answers(), 1);
        assert_eq!(engine.incorrect_answers(), 0);
        assert_eq!(engine.answered_count(), 1);
    }

    #[test]
    fn out_of_range_option_is_ignored() {
        let deck = build_deck(4);
        let progress = progress_at(0, &deck);
        let mut engine = challenge(&deck, &progress, false);
        let now = fixed_now();

        engine.begin(now);
        assert_eq!(engine.handle_answer(99), None);
        assert!(!engine.show_answer());
    }

    #[test]
    fn advance_mid_question_is_refused() {
        let deck = build_deck(4);
        let progress = progress_at(0, &deck);
        let mut engine = challenge(&deck, &progress, false);
        let now = fixed_now();

        engine.begin(now);
        assert_eq!(engine.advance(now), AdvanceOutcome::Stayed);
        assert_eq!(engine.question_index(), 0);
    }

    #[test]
    fn advance_rearms_timer_and_regenerates_options() {
        let deck = build_deck(8);
        let progress = progress_at(0, &deck);
        let mut engine = challenge(&deck, &progress, true);
        let t0 = fixed_now();

        engine.begin(t0);
        answer_correctly(&mut engine);
        // Timer disarmed by the answer.
        assert_eq!(engine.remaining_secs(t0 + Duration::seconds(10)), None);

        let t1 = t0 + Duration::seconds(12);
        assert_eq!(engine.advance(t1), AdvanceOutcome::NextQuestion);
        assert_eq!(engine.remaining_secs(t1), Some(15));
        assert_eq!(engine.options().len(), 4);
        assert!(!engine.show_answer());
    }

    #[test]
    fn early_end_commits_partial_progress() {
        let deck = build_deck(4);
        let progress = progress_at(20, &deck);
        let mut engine = challenge(&deck, &progress, false);
        let t0 = fixed_now();

        engine.begin(t0);
        answer_correctly(&mut engine);

        let outcome = engine.end_session(t0 + Duration::seconds(9)).unwrap();
        assert!(outcome.ended_early);
        assert_eq!(outcome.correct, 1);
        assert_eq!(outcome.study_secs, 9);
        assert_eq!(outcome.final_mastery().value(), 21);
        assert_eq!(engine.view(), SessionView::Saving);

        // A second end is a no-op once saving started.
        assert!(engine.end_session(t0 + Duration::seconds(20)).is_none());
    }

    #[test]
    fn clock_freezes_at_completion() {
        let deck = build_deck(4);
        let progress = progress_at(0, &deck);
        let mut engine = challenge(&deck, &progress, false);
        let t0 = fixed_now();

        engine.begin(t0);
        let outcome = engine.end_session(t0 + Duration::seconds(30)).unwrap();
        assert_eq!(outcome.study_secs, 30);

        // Elapsed time no longer moves after the freeze.
        assert_eq!(engine.elapsed_secs(t0 + Duration::seconds(90)), 30);
    }

    #[test]
    fn flip_reveal_and_advance() {
        let deck = build_deck(3);
        let progress = progress_at(0, &deck);
        let mut engine =
            StudySessionEngine::flip(progress.user_id(), &deck, &progress).unwrap();
        let t0 = fixed_now();

        engine.begin(t0);
        assert!(engine.options().is_empty());
        assert!(engine.remaining_secs(t0).is_none());

        engine.reveal();
        assert!(engine.show_answer());
        assert_eq!(engine.advance(t0), AdvanceOutcome::NextQuestion);
        assert!(!engine.show_answer());

        engine.advance(t0);
        let outcome = match engine.advance(t0 + Duration::seconds(600)) {
            AdvanceOutcome::Complete(outcome) => outcome,
            other => panic!("expected completion, got {other:?}"),
        };

        // Ten flip minutes from mastery 0 earn ten points.
        assert_eq!(outcome.final_mastery().value(), 10);
    }

    #[test]
    fn quiz_marks_exactly_one_preset_option_correct() {
        let deck = build_deck(4);
        let progress = progress_at(0, &deck);
        let questions = vec![
            QuizQuestion {
                id: CardId::new(1),
                question: "Pick A1".into(),
                answer: "A1".into(),
                options: vec!["A1".into(), "x".into(), "A1".into(), "y".into()],
            },
            QuizQuestion {
                id: CardId::new(2),
                question: "Answer missing from options".into(),
                answer: "A2".into(),
                options: vec!["p".into(), "q".into(), "r".into(), "s".into()],
            },
        ];
        let mut engine =
            StudySessionEngine::quiz(progress.user_id(), &deck, &progress, questions).unwrap();
        let now = fixed_now();

        engine.begin(now);
        assert_eq!(engine.options().iter().filter(|o| o.is_correct).count(), 1);
        answer_correctly(&mut engine);

        engine.advance(now);
        // The missing answer was patched into the option set.
        assert!(engine.options().iter().any(|o| o.is_correct && o.text == "A2"));
    }

    #[test]
    fn quiz_requires_questions() {
        let deck = build_deck(4);
        let progress = progress_at(0, &deck);
        let err = StudySessionEngine::quiz(progress.user_id(), &deck, &progress, Vec::new())
            .unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn untimed_challenge_never_expires() {
        let deck = build_deck(4);
        let progress = progress_at(0, &deck);
        let mut engine = challenge(&deck, &progress, false);
        let t0 = fixed_now();

        engine.begin(t0);
        assert!(engine.remaining_secs(t0).is_none());
        assert!(!engine.tick(t0 + Duration::seconds(3_600)));
        assert_eq!(engine.incorrect_answers(), 0);
    }
}
