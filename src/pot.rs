//! Pot accounting and side-pot derivation.
//!
//! Side pots are computed from the sorted distinct contribution levels of a
//! hand, so any number of simultaneous all-ins splits the same way.

/// Chips in the middle plus the betting line for the current street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PotState {
    /// All chips committed this hand. Only decreases when awarded.
    pub total: u64,
    /// Highest per-street contribution a player must match.
    pub current_bet: u64,
    /// Smallest legal raise increment.
    pub min_raise: u64,
}

impl PotState {
    pub fn new(big_blind: u64) -> Self {
        Self { total: 0, current_bet: 0, min_raise: big_blind.max(1) }
    }

    pub(crate) fn collect(&mut self, amount: u64) {
        self.total += amount;
    }

    /// Register a new high bet of `to`. Full raises widen the increment; short all-ins do not.
    pub(crate) fn raise_to(&mut self, to: u64) -> bool {
        if to <= self.current_bet {
            return false;
        }
        let increment = to - self.current_bet;
        let full = increment >= self.min_raise;
        if full {
            self.min_raise = increment;
        }
        self.current_bet = to;
        full
    }

    pub(crate) fn new_street(&mut self, big_blind: u64) {
        self.current_bet = 0;
        self.min_raise = big_blind.max(1);
    }

    pub(crate) fn take_all(&mut self) -> u64 {
        std::mem::take(&mut self.total)
    }
}

/// One seat's stake in the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub seat: usize,
    pub amount: u64,
    /// Still holding cards; folded seats fund pots but cannot win them.
    pub live: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidePot {
    pub amount: u64,
    /// Live seats that may win this pot, in seat order.
    pub eligible: Vec<usize>,
}

/// Split contributions into a main pot and side pots.
///
/// Chips from a level with no live contributor join the previous pot.
///
/// ```
/// use holdem_rs::pot::{side_pots, Contribution};
///
/// let pots = side_pots(&[
///     Contribution { seat: 0, amount: 50, live: true },
///     Contribution { seat: 1, amount: 100, live: true },
///     Contribution { seat: 2, amount: 100, live: true },
/// ]);
/// assert_eq!(pots[0].amount, 150);
/// assert_eq!(pots[1].amount, 100);
/// assert_eq!(pots[1].eligible, vec![1, 2]);
/// ```
pub fn side_pots(contributions: &[Contribution]) -> Vec<SidePot> {
    let mut levels: Vec<u64> =
        contributions.iter().map(|c| c.amount).filter(|&a| a > 0).collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots: Vec<SidePot> = Vec::new();
    let mut carry = 0u64;
    let mut prev = 0u64;
    for level in levels {
        let payers = contributions.iter().filter(|c| c.amount >= level).count() as u64;
        let amount = (level - prev) * payers + carry;
        prev = level;
        let mut eligible: Vec<usize> =
            contributions.iter().filter(|c| c.live && c.amount >= level).map(|c| c.seat).collect();
        eligible.sort_unstable();
        if eligible.is_empty() {
            match pots.last_mut() {
                Some(last) => last.amount += amount,
                None => carry = amount,
            }
            continue;
        }
        carry = 0;
        match pots.last_mut() {
            // Same contenders as the pot below: one pot, not two.
            Some(last) if last.eligible == eligible => last.amount += amount,
            _ => pots.push(SidePot { amount, eligible }),
        }
    }
    pots
}

/// Seats ordered clockwise starting left of the dealer.
pub fn clockwise_from_dealer(seats: &mut [usize], dealer: usize, num_seats: usize) {
    if num_seats == 0 {
        return;
    }
    let start = (dealer + 1) % num_seats;
    seats.sort_by_key(|&s| (s + num_seats - start) % num_seats);
}

/// Divide `amount` among `winners` (already in award order); remainder chips go one
/// each to the earliest winners.
pub fn split_amount(amount: u64, winners: &[usize]) -> Vec<(usize, u64)> {
    if winners.is_empty() {
        return Vec::new();
    }
    let n = winners.len() as u64;
    let share = amount / n;
    let odd = amount % n;
    winners
        .iter()
        .enumerate()
        .map(|(i, &seat)| (seat, share + u64::from((i as u64) < odd)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(seat: usize, amount: u64, live: bool) -> Contribution {
        Contribution { seat, amount, live }
    }

    #[test]
    fn equal_stakes_make_one_pot() {
        let pots = side_pots(&[c(0, 100, true), c(1, 100, true), c(2, 100, true)]);
        assert_eq!(pots, vec![SidePot { amount: 300, eligible: vec![0, 1, 2] }]);
    }

    #[test]
    fn three_all_in_levels() {
        let pots = side_pots(&[c(0, 100, true), c(1, 50, true), c(2, 200, true)]);
        assert_eq!(pots.len(), 3);
        assert_eq!(pots[0], SidePot { amount: 150, eligible: vec![0, 1, 2] });
        assert_eq!(pots[1], SidePot { amount: 100, eligible: vec![0, 2] });
        assert_eq!(pots[2], SidePot { amount: 100, eligible: vec![2] });
    }

    #[test]
    fn folded_chips_stay_in_pot_without_eligibility() {
        let pots = side_pots(&[c(0, 30, false), c(1, 100, true), c(2, 100, true)]);
        assert_eq!(pots, vec![SidePot { amount: 230, eligible: vec![1, 2] }]);
    }

    #[test]
    fn dead_top_level_merges_down() {
        let pots = side_pots(&[c(0, 40, true), c(1, 100, false)]);
        assert_eq!(pots, vec![SidePot { amount: 140, eligible: vec![0] }]);
    }

    #[test]
    fn pots_conserve_chips() {
        let contribs = [c(0, 7, true), c(1, 13, false), c(2, 13, true), c(3, 29, true), c(4, 0, false)];
        let total: u64 = side_pots(&contribs).iter().map(|p| p.amount).sum();
        assert_eq!(total, 62);
    }

    #[test]
    fn odd_chip_goes_first() {
        assert_eq!(split_amount(7, &[4, 1]), vec![(4, 4), (1, 3)]);
        assert_eq!(split_amount(10, &[2, 0, 1]), vec![(2, 4), (0, 3), (1, 3)]);
        assert!(split_amount(10, &[]).is_empty());
    }

    #[test]
    fn clockwise_order_starts_left_of_dealer() {
        let mut seats = vec![0, 1, 3];
        clockwise_from_dealer(&mut seats, 1, 4);
        assert_eq!(seats, vec![3, 0, 1]);
    }

    #[test]
    fn raise_tracking() {
        let mut pot = PotState::new(10);
        assert!(pot.raise_to(10));
        assert!(pot.raise_to(30));
        assert_eq!(pot.min_raise, 20);
        assert!(!pot.raise_to(45), "short raise does not reopen");
        assert_eq!((pot.current_bet, pot.min_raise), (45, 20));
        pot.new_street(10);
        assert_eq!((pot.current_bet, pot.min_raise), (0, 10));
    }
}
