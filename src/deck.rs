use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("requested {requested} cards but only {remaining} remain")]
    InsufficientCards { requested: usize, remaining: usize },
    #[error("duplicate card in stacked order: {0}")]
    DuplicateCard(Card),
}

/// The deck for one hand. Starts as the 52 unique cards and only shrinks by dealing.
///
/// The top of the deck is the end of the internal vector.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use holdem_rs::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s)))
            .collect();
        Self { cards }
    }

    /// A freshly shuffled deck.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_with(rng);
        deck
    }

    /// A full deck whose first deals are `top`, in order; the rest follow in standard order.
    ///
    /// Used to replay a known deal.
    pub fn stacked(top: &[Card]) -> Result<Self, DeckError> {
        let mut used = 0u64;
        for &c in top {
            if used & c.mask() != 0 {
                return Err(DeckError::DuplicateCard(c));
            }
            used |= c.mask();
        }
        let mut cards: Vec<Card> =
            Self::standard().cards.into_iter().filter(|c| used & c.mask() == 0).collect();
        cards.extend(top.iter().rev().copied());
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Full permutation of the remaining cards.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Remove and return the top `n` cards, or fail without dealing any.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if n > self.cards.len() {
            return Err(DeckError::InsufficientCards { requested: n, remaining: self.cards.len() });
        }
        let split = self.cards.len() - n;
        let mut dealt = self.cards.split_off(split);
        dealt.reverse();
        Ok(dealt)
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }
}

/// Every card not present in `known`, in standard order.
pub fn remaining_cards(known: u64) -> Vec<Card> {
    Deck::standard().cards.into_iter().filter(|c| known & c.mask() == 0).collect()
}
