use crate::cards::Rank;

/// Rank multiplicities of a five-card hand, each bucket ordered high to low.
///
/// `AAKKQ` has no quad or trips, pairs `[A, K]` and kicker `[Q]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankGroups {
    quad: Option<Rank>,
    trips: Option<Rank>,
    pairs: [Rank; 2],
    pair_len: usize,
    kickers: [Rank; 5],
    kicker_len: usize,
}

impl RankGroups {
    /// `ranks` must be sorted descending.
    pub fn new(ranks: &[Rank; 5]) -> Self {
        let mut counts = [0u8; 15];
        for r in ranks {
            counts[usize::from(r.value())] += 1;
        }
        let mut groups = Self {
            quad: None,
            trips: None,
            pairs: [Rank::Two; 2],
            pair_len: 0,
            kickers: [Rank::Two; 5],
            kicker_len: 0,
        };
        for &rank in Rank::ALL.iter().rev() {
            match counts[usize::from(rank.value())] {
                4 => groups.quad = Some(rank),
                3 => groups.trips = Some(rank),
                2 => {
                    groups.pairs[groups.pair_len] = rank;
                    groups.pair_len += 1;
                }
                1 => {
                    groups.kickers[groups.kicker_len] = rank;
                    groups.kicker_len += 1;
                }
                _ => {}
            }
        }
        groups
    }

    pub fn quad(&self) -> Option<Rank> {
        self.quad
    }

    pub fn trips(&self) -> Option<Rank> {
        self.trips
    }

    pub fn pairs(&self) -> &[Rank] {
        &self.pairs[..self.pair_len]
    }

    pub fn kickers(&self) -> &[Rank] {
        &self.kickers[..self.kicker_len]
    }

    pub fn has_full_house(&self) -> bool {
        self.trips.is_some() && self.pair_len > 0
    }
}
