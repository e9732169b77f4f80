//! Draw pile: an ordered sequence of cards where the end of the vector is the top

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shared::Card;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("index {index} is outside 0..={size}")]
    IndexOutOfRange { index: usize, size: usize },
}

/// Base deck content before Exploding Kittens and Defuses are added
const BASE_CARDS: [(Card, usize); 11] = [
    (Card::Attack, 4),
    (Card::Favor, 4),
    (Card::Nope, 5),
    (Card::Shuffle, 4),
    (Card::Skip, 4),
    (Card::SeeTheFuture, 5),
    (Card::BeardCat, 4),
    (Card::Cattermelon, 4),
    (Card::HairyPotatoCat, 4),
    (Card::RainbowRalphingCat, 4),
    (Card::Tacocat, 4),
];

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    rng: StdRng,
}

impl Deck {
    /// Standard shuffled deck without kittens or defuses
    pub fn standard(seed: Option<u64>) -> Self {
        let mut deck = Self::from_cards(Vec::new(), seed);
        deck.seed(&BASE_CARDS);
        deck.shuffle();
        deck
    }

    /// Deck holding exactly `cards` in the given order, the last one on top
    pub fn from_cards(cards: Vec<Card>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { cards, rng }
    }

    pub fn seed(&mut self, base: &[(Card, usize)]) {
        for &(card, quantity) in base {
            self.add_cards(card, quantity);
        }
    }

    /// Adds `player_count - 1` Exploding Kittens and the Defuses left in the pool,
    /// then reshuffles everything.
    pub fn add_kittens_and_defuses(&mut self, player_count: usize, defuse_pool: usize) {
        self.add_cards(Card::Defuse, defuse_pool.saturating_sub(player_count));
        self.add_cards(Card::ExplodingKitten, player_count.saturating_sub(1));
        self.shuffle();
    }

    fn add_cards(&mut self, card: Card, quantity: usize) {
        self.cards.extend(std::iter::repeat(card).take(quantity));
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    pub fn draw_card(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn draw_cards(&mut self, count: usize) -> Vec<Card> {
        let keep = self.cards.len().saturating_sub(count);
        let mut drawn = self.cards.split_off(keep);
        drawn.reverse();
        drawn
    }

    /// Top `count` cards, topmost first
    pub fn peek_top(&self, count: usize) -> Vec<Card> {
        self.cards.iter().rev().take(count).copied().collect()
    }

    /// Inserts at `index` where 0 is the bottom and `len()` is the top
    pub fn insert_at(&mut self, card: Card, index: usize) -> Result<(), DeckError> {
        if index > self.cards.len() {
            return Err(DeckError::IndexOutOfRange {
                index,
                size: self.cards.len(),
            });
        }
        self.cards.insert(index, card);
        Ok(())
    }

    pub fn count(&self, card: Card) -> usize {
        self.cards.iter().filter(|c| **c == card).count()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_deck_content() {
        let deck = Deck::standard(Some(1));
        assert_eq!(deck.len(), 46);
        assert_eq!(deck.count(Card::Nope), 5);
        assert_eq!(deck.count(Card::SeeTheFuture), 5);
        assert_eq!(deck.count(Card::ExplodingKitten), 0);
        assert_eq!(deck.count(Card::Defuse), 0);
    }

    #[test]
    fn test_seeded_decks_are_reproducible() {
        let a = Deck::standard(Some(42));
        let b = Deck::standard(Some(42));
        assert_eq!(a.cards(), b.cards());
    }

    #[test]
    fn test_kittens_and_defuses_per_player_count() {
        for players in 2..=6 {
            let mut deck = Deck::standard(Some(players as u64));
            deck.add_kittens_and_defuses(players, 6);
            assert_eq!(deck.count(Card::ExplodingKitten), players - 1);
            assert_eq!(deck.count(Card::Defuse), 6 - players);
            assert_eq!(deck.len(), 46 + (players - 1) + (6 - players));
        }
    }

    #[test]
    fn test_draw_takes_from_top() {
        let mut deck = Deck::from_cards(vec![Card::Skip, Card::Attack, Card::Tacocat], Some(0));
        assert_eq!(deck.draw_card(), Some(Card::Tacocat));
        assert_eq!(deck.draw_card(), Some(Card::Attack));
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_draw_cards_topmost_first() {
        let mut deck = Deck::from_cards(vec![Card::Skip, Card::Attack, Card::Tacocat], Some(0));
        assert_eq!(deck.draw_cards(2), vec![Card::Tacocat, Card::Attack]);
        assert_eq!(deck.draw_cards(5), vec![Card::Skip]);
        assert!(deck.is_empty());
        assert_eq!(deck.draw_card(), None);
    }

    #[test]
    fn test_peek_does_not_mutate() {
        let deck = Deck::from_cards(
            vec![Card::Nope, Card::Skip, Card::Attack, Card::Tacocat],
            Some(0),
        );
        assert_eq!(deck.peek_top(3), vec![Card::Tacocat, Card::Attack, Card::Skip]);
        assert_eq!(deck.peek_top(10).len(), 4);
        assert_eq!(deck.len(), 4);
    }

    #[test]
    fn test_insert_bounds() {
        let mut deck = Deck::from_cards(vec![Card::Skip, Card::Attack], Some(0));

        deck.insert_at(Card::ExplodingKitten, 0).unwrap();
        assert_eq!(deck.cards()[0], Card::ExplodingKitten);

        deck.insert_at(Card::Defuse, deck.len()).unwrap();
        assert_eq!(deck.peek_top(1), vec![Card::Defuse]);

        assert_eq!(
            deck.insert_at(Card::Nope, 9),
            Err(DeckError::IndexOutOfRange { index: 9, size: 4 })
        );
        assert_eq!(deck.len(), 4);
    }
}
