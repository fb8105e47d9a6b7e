use super::hand_analysis::HandAnalysis;
use crate::cards::Rank;
use crate::evaluator::{Category, HandResult};

/// One hand category: how to recognise it and how to rank it against its peers.
pub(crate) trait CategoryDetector: Sync {
    fn detect(&self, a: &HandAnalysis) -> bool;
    fn build(&self, a: &HandAnalysis) -> HandResult;
}

/// Straight flush, promoted to royal when the ace tops it.
struct StraightFlushDetector;

impl CategoryDetector for StraightFlushDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.is_flush && a.straight_top.is_some()
    }

    fn build(&self, a: &HandAnalysis) -> HandResult {
        let top = a.straight_top.unwrap_or(Rank::Five);
        let category =
            if top == Rank::Ace { Category::RoyalFlush } else { Category::StraightFlush };
        a.result(category, &[top])
    }
}

struct FourOfAKindDetector;

impl CategoryDetector for FourOfAKindDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.groups.quad().is_some()
    }

    fn build(&self, a: &HandAnalysis) -> HandResult {
        let quad = a.groups.quad().unwrap_or(Rank::Two);
        let kicker = a.groups.kickers().first().copied().unwrap_or(Rank::Two);
        a.result(Category::FourOfAKind, &[quad, kicker])
    }
}

struct FullHouseDetector;

impl CategoryDetector for FullHouseDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.groups.has_full_house()
    }

    fn build(&self, a: &HandAnalysis) -> HandResult {
        let trips = a.groups.trips().unwrap_or(Rank::Two);
        let pair = a.groups.pairs().first().copied().unwrap_or(Rank::Two);
        a.result(Category::FullHouse, &[trips, pair])
    }
}

struct FlushDetector;

impl CategoryDetector for FlushDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.is_flush
    }

    fn build(&self, a: &HandAnalysis) -> HandResult {
        a.result(Category::Flush, &a.ranks)
    }
}

struct StraightDetector;

impl CategoryDetector for StraightDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.straight_top.is_some()
    }

    fn build(&self, a: &HandAnalysis) -> HandResult {
        a.result(Category::Straight, &[a.straight_top.unwrap_or(Rank::Five)])
    }
}

struct ThreeOfAKindDetector;

impl CategoryDetector for ThreeOfAKindDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.groups.trips().is_some()
    }

    fn build(&self, a: &HandAnalysis) -> HandResult {
        let mut tb = vec![a.groups.trips().unwrap_or(Rank::Two)];
        tb.extend_from_slice(a.groups.kickers());
        a.result(Category::ThreeOfAKind, &tb)
    }
}

struct TwoPairDetector;

impl CategoryDetector for TwoPairDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.groups.pairs().len() == 2
    }

    fn build(&self, a: &HandAnalysis) -> HandResult {
        let mut tb = a.groups.pairs().to_vec();
        tb.extend_from_slice(a.groups.kickers());
        a.result(Category::TwoPair, &tb)
    }
}

struct OnePairDetector;

impl CategoryDetector for OnePairDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.groups.pairs().len() == 1
    }

    fn build(&self, a: &HandAnalysis) -> HandResult {
        let mut tb = a.groups.pairs().to_vec();
        tb.extend_from_slice(a.groups.kickers());
        a.result(Category::Pair, &tb)
    }
}

/// Checked in order; the first match wins. High card is the fallback.
pub(crate) const DETECTORS: [&dyn CategoryDetector; 8] = [
    &StraightFlushDetector,
    &FourOfAKindDetector,
    &FullHouseDetector,
    &FlushDetector,
    &StraightDetector,
    &ThreeOfAKindDetector,
    &TwoPairDetector,
    &OnePairDetector,
];
