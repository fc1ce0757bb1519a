//! Multiple-choice option sets.

use rand::Rng;
use rand::seq::SliceRandom;

use study_core::model::{Deck, Flashcard};

/// One multiple-choice option as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub text: String,
    pub is_correct: bool,
}

/// Build the option set for a target card.
///
/// Produces exactly `count` options: one correct entry carrying the target's
/// answer and `count - 1` distractors drawn from the other answers in the
/// deck. Distractors are unique while the deck has enough distinct answers;
/// a smaller deck degrades to repeats instead of failing. The returned set
/// is shuffled, so the correct position is decided by `rng`.
#[must_use]
pub fn generate<R: Rng + ?Sized>(
    target: &Flashcard,
    deck: &Deck,
    count: usize,
    rng: &mut R,
) -> Vec<AnswerOption> {
    let pool = deck.other_answers(target.id());
    from_pool(target.answer(), &pool, count, rng)
}

/// Build an option set from an explicit distractor pool.
///
/// `pool` must not contain the correct answer; entries are treated as
/// already deduplicated.
#[must_use]
pub fn from_pool<R: Rng + ?Sized>(
    correct: &str,
    pool: &[&str],
    count: usize,
    rng: &mut R,
) -> Vec<AnswerOption> {
    let needed = count.saturating_sub(1);

    let mut distractors: Vec<&str> = pool.to_vec();
    distractors.shuffle(rng);

    let mut picked: Vec<&str> = Vec::with_capacity(needed);
    if distractors.is_empty() {
        // Single-card deck: nothing else to offer, repeat the answer text.
        picked.resize(needed, correct);
    } else {
        // First cycle uses each distinct answer once; later cycles repeat.
        let mut i = 0;
        while picked.len() < needed {
            picked.push(distractors[i % distractors.len()]);
            i += 1;
        }
    }

    let mut options: Vec<AnswerOption> = picked
        .into_iter()
        .map(|text| AnswerOption {
            text: text.to_owned(),
            is_correct: false,
        })
        .collect();
    options.push(AnswerOption {
        text: correct.to_owned(),
        is_correct: true,
    });
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use study_core::model::{CardId, DeckId};
    use study_core::time::fixed_now;

    fn deck_with_answers(answers: &[&str]) -> Deck {
        let deck_id = DeckId::new(1);
        let cards = answers
            .iter()
            .enumerate()
            .map(|(i, answer)| {
                Flashcard::new(
                    CardId::new(i as u64 + 1),
                    deck_id,
                    format!("Q{i}"),
                    *answer,
                    None,
                )
                .unwrap()
            })
            .collect();
        Deck::new(deck_id, "Deck", None, cards, fixed_now()).unwrap()
    }

    #[test]
    fn exactly_one_correct_option() {
        let deck = deck_with_answers(&["a", "b", "c", "d", "e"]);
        let mut rng = StdRng::seed_from_u64(7);

        for card in deck.cards() {
            let options = generate(card, &deck, 4, &mut rng);
            assert_eq!(options.len(), 4);
            assert_eq!(options.iter().filter(|o| o.is_correct).count(), 1);
            let correct = options.iter().find(|o| o.is_correct).unwrap();
            assert_eq!(correct.text, card.answer());
        }
    }

    #[test]
    fn options_are_unique_with_enough_answers() {
        let deck = deck_with_answers(&["a", "b", "c", "d", "e", "f"]);
        let mut rng = StdRng::seed_from_u64(3);

        let options = generate(&deck.cards()[0], &deck, 4, &mut rng);
        let texts: HashSet<&str> = options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts.len(), 4);
        assert!(!texts.contains("a") || options.iter().any(|o| o.is_correct && o.text == "a"));
    }

    #[test]
    fn small_deck_degrades_to_repeats() {
        let deck = deck_with_answers(&["a", "b"]);
        let mut rng = StdRng::seed_from_u64(11);

        let options = generate(&deck.cards()[0], &deck, 4, &mut rng);
        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|o| o.is_correct).count(), 1);
        // Every distractor comes from the only other answer.
        assert!(options
            .iter()
            .filter(|o| !o.is_correct)
            .all(|o| o.text == "b"));
    }

    #[test]
    fn single_card_deck_still_yields_full_set() {
        let deck = deck_with_answers(&["only"]);
        let mut rng = StdRng::seed_from_u64(11);

        let options = generate(&deck.cards()[0], &deck, 4, &mut rng);
        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|o| o.is_correct).count(), 1);
    }

    #[test]
    fn duplicate_answers_do_not_leak_the_correct_text() {
        // Two cards share the answer "a"; the pool for card 1 must not
        // include it as a distractor.
        let deck = deck_with_answers(&["a", "a", "b", "c"]);
        let mut rng = StdRng::seed_from_u64(5);

        let options = generate(&deck.cards()[0], &deck, 4, &mut rng);
        assert!(options
            .iter()
            .filter(|o| !o.is_correct)
            .all(|o| o.text != "a"));
    }

    #[test]
    fn shuffle_position_depends_on_seed() {
        let deck = deck_with_answers(&["a", "b", "c", "d", "e"]);

        let position = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            generate(&deck.cards()[0], &deck, 4, &mut rng)
                .iter()
                .position(|o| o.is_correct)
                .unwrap()
        };

        let positions: HashSet<usize> = (0..16).map(position).collect();
        assert!(positions.len() > 1, "correct answer position is fixed");
    }
}
