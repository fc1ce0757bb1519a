//! Card selection for a session.

use rand::Rng;
use rand::seq::SliceRandom;

use study_core::model::{Deck, Flashcard};

/// The ordered working set of one session.
///
/// Selection happens once, at session start; the set never reshuffles for
/// the remainder of the session.
#[derive(Debug, Clone)]
pub struct CardSelector {
    cards: Vec<Flashcard>,
}

impl CardSelector {
    /// Random subset for Challenge mode, capped at `limit`.
    #[must_use]
    pub fn challenge_subset<R: Rng + ?Sized>(deck: &Deck, limit: usize, rng: &mut R) -> Self {
        let mut cards = deck.cards().to_vec();
        cards.shuffle(rng);
        cards.truncate(limit);
        Self { cards }
    }

    /// Every card in deck order, for Flip mode.
    #[must_use]
    pub fn full_deck(deck: &Deck) -> Self {
        Self {
            cards: deck.cards().to_vec(),
        }
    }

    /// Pure lookup; `None` past the end is the terminal condition.
    #[must_use]
    pub fn card(&self, index: usize) -> Option<&Flashcard> {
        self.cards.get(index)
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use study_core::model::{CardId, DeckId};
    use study_core::time::fixed_now;

    fn deck(cards: usize) -> Deck {
        let deck_id = DeckId::new(1);
        let cards = (1..=cards as u64)
            .map(|n| {
                Flashcard::new(CardId::new(n), deck_id, format!("Q{n}"), format!("A{n}"), None)
                    .unwrap()
            })
            .collect();
        Deck::new(deck_id, "Deck", None, cards, fixed_now()).unwrap()
    }

    #[test]
    fn subset_caps_at_limit_without_duplicates() {
        let deck = deck(20);
        let mut rng = StdRng::seed_from_u64(1);
        let selector = CardSelector::challenge_subset(&deck, 10, &mut rng);

        assert_eq!(selector.len(), 10);
        let ids: HashSet<CardId> = selector.cards().iter().map(Flashcard::id).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn small_deck_selects_everything() {
        let deck = deck(4);
        let mut rng = StdRng::seed_from_u64(1);
        let selector = CardSelector::challenge_subset(&deck, 10, &mut rng);
        assert_eq!(selector.len(), 4);
    }

    #[test]
    fn lookup_past_end_is_none() {
        let deck = deck(4);
        let selector = CardSelector::full_deck(&deck);
        assert!(selector.card(3).is_some());
        assert!(selector.card(4).is_none());
    }

    #[test]
    fn full_deck_preserves_order() {
        let deck = deck(5);
        let selector = CardSelector::full_deck(&deck);
        let ids: Vec<u64> = selector.cards().iter().map(|c| c.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn selection_is_stable_once_made() {
        let deck = deck(12);
        let mut rng = StdRng::seed_from_u64(9);
        let selector = CardSelector::challenge_subset(&deck, 6, &mut rng);

        let first: Vec<CardId> = selector.cards().iter().map(Flashcard::id).collect();
        let again: Vec<CardId> = (0..selector.len())
            .map(|i| selector.card(i).unwrap().id())
            .collect();
        assert_eq!(first, again);
    }
}
