//! The dealer's deck: cards not currently on the board.

use serde::{Deserialize, Serialize};

use super::card::Card;
use crate::core::GameRng;

/// Cards waiting to be dealt. Order only matters after a shuffle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Every card `0..deck_size`, unshuffled.
    #[must_use]
    pub fn full(deck_size: usize) -> Self {
        Self {
            cards: (0..deck_size as u32).map(Card::new).collect(),
        }
    }

    /// A deck that deals `cards` front to back until shuffled.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut cards: Vec<Card> = cards.into_iter().collect();
        cards.reverse();
        Self { cards }
    }

    /// Uniformly permute the remaining cards.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Take the next card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Return a card collected from the board.
    pub fn put_back(&mut self, card: Card) {
        self.cards.push(card);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Remaining cards, in no particular order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_deck() {
        let deck = Deck::full(81);
        assert_eq!(deck.len(), 81);
        assert!(deck.contains(Card::new(0)));
        assert!(deck.contains(Card::new(80)));
        assert!(!deck.contains(Card::new(81)));
    }

    #[test]
    fn test_from_cards_deals_in_order() {
        let mut deck = Deck::from_cards([Card::new(5), Card::new(1), Card::new(9)]);
        assert_eq!(deck.draw(), Some(Card::new(5)));
        assert_eq!(deck.draw(), Some(Card::new(1)));
        assert_eq!(deck.draw(), Some(Card::new(9)));
        assert_eq!(deck.draw(), None);
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut deck = Deck::full(81);
        let mut rng = GameRng::new(3);
        deck.shuffle(&mut rng);

        let mut cards = deck.cards().to_vec();
        cards.sort();
        assert_eq!(cards, Deck::full(81).cards().to_vec());
    }

    #[test]
    fn test_put_back() {
        let mut deck = Deck::default();
        assert!(deck.is_empty());
        deck.put_back(Card::new(4));
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.draw(), Some(Card::new(4)));
    }
}
