//! Best-five hand evaluation for 5 to 7 cards.
//!
//! Every five-card subset is scored by a fixed list of category detectors
//! (strongest first) and the maximum is kept. Results compare by category,
//! then by the tiebreak ranks left to right.

pub(crate) mod combinations;
pub(crate) mod detector;
pub(crate) mod hand_analysis;
pub(crate) mod rank_groups;

use crate::cards::{Card, Rank};
use crate::hand::{validate_holdem, Board, HandError, HoleCards};
use core::cmp::Ordering;
use core::fmt;

/// Packed, comparable hand strength. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct HandValue(u64);

impl HandValue {
    /// Layout, most significant first: category (8 bits) then five 6-bit ranks.
    pub(crate) fn from_parts(category: Category, ranks_desc: &[Rank; 5]) -> Self {
        const CAT_SHIFT: u32 = 48;
        const RANK_STRIDE: u32 = 6;
        let mut v: u64 = (category as u64) << CAT_SHIFT;
        for (i, r) in ranks_desc.iter().enumerate() {
            v |= (*r as u64) << (CAT_SHIFT - RANK_STRIDE * (i as u32 + 1));
        }
        HandValue(v)
    }
}

/// The ten hand rankings, weakest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::HighCard,
        Category::Pair,
        Category::TwoPair,
        Category::ThreeOfAKind,
        Category::Straight,
        Category::Flush,
        Category::FullHouse,
        Category::FourOfAKind,
        Category::StraightFlush,
        Category::RoyalFlush,
    ];

    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }

    /// Baseline strength used by bots before tiebreaks are considered.
    const fn base_strength(self) -> f64 {
        match self {
            Category::HighCard => 0.1,
            Category::Pair => 0.3,
            Category::TwoPair => 0.5,
            Category::ThreeOfAKind => 0.6,
            Category::Straight => 0.7,
            Category::Flush => 0.8,
            Category::FullHouse => 0.85,
            Category::FourOfAKind => 0.9,
            Category::StraightFlush => 0.95,
            Category::RoyalFlush => 1.0,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The best five-card hand found in a card set.
///
/// Ordering is total: category first, then `tiebreak()` element-wise.
#[derive(Debug, Clone, Copy)]
pub struct HandResult {
    pub category: Category,
    pub best_five: [Card; 5],
    tiebreak: [Rank; 5],
    tiebreak_len: u8,
    value: HandValue,
}

impl HandResult {
    pub(crate) fn new(category: Category, best_five: [Card; 5], ranks: &[Rank]) -> Self {
        let mut tiebreak = [Rank::Two; 5];
        let len = ranks.len().min(5);
        tiebreak[..len].copy_from_slice(&ranks[..len]);
        let value = HandValue::from_parts(category, &tiebreak);
        Self { category, best_five, tiebreak, tiebreak_len: len as u8, value }
    }

    /// Ranks that decide ties within the category, most significant first.
    pub fn tiebreak(&self) -> &[Rank] {
        &self.tiebreak[..usize::from(self.tiebreak_len)]
    }

    /// Normalised strength in [0, 1]: the category baseline lifted by the primary rank.
    pub fn strength(&self) -> f64 {
        let base = self.category.base_strength();
        let next = Category::ALL
            .get(usize::from(self.category.ordinal()) + 1)
            .map_or(1.0, |c| c.base_strength());
        let primary = self.tiebreak().first().map_or(0.0, |r| f64::from(r.value() - 2) / 12.0);
        (base + (next - base) * 0.8 * primary).clamp(0.0, 1.0)
    }

    pub fn describe(&self) -> String {
        match self.tiebreak().first() {
            Some(r) if self.category != Category::RoyalFlush => {
                format!("{} ({})", self.category, r.label())
            }
            _ => self.category.to_string(),
        }
    }
}

impl Ord for HandResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for HandResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HandResult {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for HandResult {}

/// Malformed card sets. These indicate a broken caller invariant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid input: expected 5 to 7 cards, got {0}")]
    CardCount(usize),
    #[error("invalid input: duplicate card {0}")]
    DuplicateCard(Card),
    #[error("invalid input: {0}")]
    Hand(#[from] HandError),
}

/// Evaluate the best five-card hand in 5 to 7 distinct cards.
///
/// ```
/// use holdem_rs::cards::parse_cards;
/// use holdem_rs::evaluator::{evaluate, Category};
///
/// let royal = evaluate(&parse_cards("As Ks Qs Js 10s").unwrap()).unwrap();
/// assert_eq!(royal.category, Category::RoyalFlush);
///
/// let boat = evaluate(&parse_cards("2c 2d 2h 5s 5c").unwrap()).unwrap();
/// assert_eq!(boat.category, Category::FullHouse);
/// ```
pub fn evaluate(cards: &[Card]) -> Result<HandResult, EvalError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EvalError::CardCount(cards.len()));
    }
    let mut seen = 0u64;
    for &c in cards {
        if seen & c.mask() != 0 {
            return Err(EvalError::DuplicateCard(c));
        }
        seen |= c.mask();
    }
    Ok(best_of(cards))
}

/// Evaluate hole cards against a complete board.
pub fn evaluate_holdem(hole: &HoleCards, board: &Board) -> Result<HandResult, EvalError> {
    validate_holdem(hole, board)?;
    let board_cards = board.as_slice();
    let mut cards = [hole.first(); 7];
    cards[1] = hole.second();
    cards[2..2 + board_cards.len()].copy_from_slice(board_cards);
    evaluate(&cards[..2 + board_cards.len()])
}

/// Score exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> HandResult {
    use detector::DETECTORS;
    use hand_analysis::HandAnalysis;

    let analysis = HandAnalysis::new(cards);
    DETECTORS
        .iter()
        .find(|d| d.detect(&analysis))
        .map(|d| d.build(&analysis))
        .unwrap_or_else(|| analysis.high_card())
}

/// Score seven cards without validation. Callers guarantee distinct cards.
pub fn evaluate_seven(cards: &[Card; 7]) -> HandResult {
    best_of(cards)
}

fn best_of(cards: &[Card]) -> HandResult {
    use combinations::FiveCardCombinations;

    let mut best: Option<HandResult> = None;
    for idx in FiveCardCombinations::new(cards.len()) {
        let hand = [cards[idx[0]], cards[idx[1]], cards[idx[2]], cards[idx[3]], cards[idx[4]]];
        let result = evaluate_five(&hand);
        if best.map_or(true, |b| result > b) {
            best = Some(result);
        }
    }
    best.unwrap_or_else(|| evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]))
}

/// Compare two holdings on a shared board.
///
/// ```
/// use holdem_rs::evaluator::compare_holdem;
/// use holdem_rs::hand::{Board, HoleCards};
/// use std::cmp::Ordering;
///
/// let board: Board = "Qc Jd 9h 3s 2c".parse().unwrap();
/// let aces: HoleCards = "As Ah".parse().unwrap();
/// let kings: HoleCards = "Ks Kh".parse().unwrap();
/// assert_eq!(compare_holdem(&aces, &kings, &board).unwrap(), Ordering::Greater);
/// ```
pub fn compare_holdem(a: &HoleCards, b: &HoleCards, board: &Board) -> Result<Ordering, EvalError> {
    let va = evaluate_holdem(a, board)?;
    let vb = evaluate_holdem(b, board)?;
    Ok(va.cmp(&vb))
}
