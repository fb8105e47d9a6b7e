use super::rank_groups::RankGroups;
use crate::cards::{Card, Rank};
use crate::evaluator::{Category, HandResult};

/// Facts about a five-card hand, computed once and shared by every detector.
#[derive(Debug, Clone)]
pub(crate) struct HandAnalysis {
    /// Rank descending, then suit descending.
    pub sorted_cards: [Card; 5],
    pub ranks: [Rank; 5],
    pub groups: RankGroups,
    pub is_flush: bool,
    /// Highest card of the straight; `Five` for the wheel.
    pub straight_top: Option<Rank>,
}

impl HandAnalysis {
    pub fn new(cards: &[Card; 5]) -> Self {
        let mut sorted_cards = *cards;
        sorted_cards.sort_by(|a, b| b.rank().cmp(&a.rank()).then(b.suit().cmp(&a.suit())));
        let ranks = sorted_cards.map(|c| c.rank());
        let suit = sorted_cards[0].suit();
        let is_flush = sorted_cards.iter().all(|c| c.suit() == suit);
        Self {
            sorted_cards,
            ranks,
            groups: RankGroups::new(&ranks),
            is_flush,
            straight_top: straight_top(&ranks),
        }
    }

    pub fn result(&self, category: Category, tiebreak: &[Rank]) -> HandResult {
        HandResult::new(category, self.sorted_cards, tiebreak)
    }

    pub fn high_card(&self) -> HandResult {
        self.result(Category::HighCard, &self.ranks)
    }
}

/// `ranks` must be sorted descending.
fn straight_top(ranks: &[Rank; 5]) -> Option<Rank> {
    if ranks.windows(2).all(|w| w[0].value() == w[1].value() + 1) {
        return Some(ranks[0]);
    }
    let wheel = [Rank::Ace, Rank::Five, Rank::Four, Rank::Three, Rank::Two];
    (*ranks == wheel).then_some(Rank::Five)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn analyze(s: &str) -> HandAnalysis {
        let cards = parse_cards(s).unwrap();
        let arr: [Card; 5] = cards.try_into().unwrap();
        HandAnalysis::new(&arr)
    }

    #[test]
    fn sorts_descending() {
        let a = analyze("3s Ah 5d Kc 9s");
        assert_eq!(a.ranks, [Rank::Ace, Rank::King, Rank::Nine, Rank::Five, Rank::Three]);
        assert!(!a.is_flush);
        assert_eq!(a.straight_top, None);
    }

    #[test]
    fn wheel_tops_at_five() {
        assert_eq!(analyze("As 2h 3d 4c 5s").straight_top, Some(Rank::Five));
        assert_eq!(analyze("6s 2h 3d 4c 5s").straight_top, Some(Rank::Six));
    }

    #[test]
    fn paired_hand_is_never_straight() {
        assert_eq!(analyze("As Ad Kc Qh Js").straight_top, None);
    }

    #[test]
    fn flush_detection() {
        assert!(analyze("Ad Jd 9d 5d 2d").is_flush);
        assert!(!analyze("Ad Jd 9d 5d 2c").is_flush);
    }
}
