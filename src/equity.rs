//! Monte Carlo win/tie/loss estimation.
//!
//! Each trial completes the board and deals hole cards to every unknown
//! opponent from the cards nobody can see, then compares best hands.
//! Randomness is drawn only from the caller's rng, so a fixed seed replays
//! the same estimate.

use crate::cards::Card;
use crate::deck::remaining_cards;
use crate::evaluator::{evaluate_seven, HandResult};
use crate::hand::{validate_holdem, Board, HoleCards};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EquityError {
    #[error("insufficient cards: need {needed}, only {available} unseen")]
    InsufficientCards { needed: usize, available: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Outcome frequencies for the acting player. `win + tie + loss == 1`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Equity {
    pub win: f64,
    pub tie: f64,
    pub loss: f64,
    pub trials: u32,
}

impl Equity {
    fn from_tally(t: Tally) -> Self {
        let n = t.total().max(1) as f64;
        Self {
            win: t.win as f64 / n,
            tie: t.tie as f64 / n,
            loss: t.loss as f64 / n,
            trials: t.total(),
        }
    }

    /// Share of the pot expected on average, counting a tie as half.
    pub fn share(&self) -> f64 {
        self.win + self.tie / 2.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    win: u32,
    tie: u32,
    loss: u32,
}

impl Tally {
    fn total(&self) -> u32 {
        self.win + self.tie + self.loss
    }

    #[cfg(feature = "parallel")]
    fn merge(self, other: Tally) -> Tally {
        Tally { win: self.win + other.win, tie: self.tie + other.tie, loss: self.loss + other.loss }
    }
}

/// Everything a trial needs, fixed for the whole run.
struct Scenario {
    hole: HoleCards,
    board: Vec<Card>,
    known: Vec<HoleCards>,
    random_opponents: usize,
    unseen: Vec<Card>,
}

impl Scenario {
    fn needed(&self) -> usize {
        (5 - self.board.len()) + 2 * self.random_opponents
    }

    fn run<R: Rng + ?Sized>(&self, trials: u32, rng: &mut R) -> Tally {
        let needed = self.needed();
        let mut pool = self.unseen.clone();
        let mut tally = Tally::default();
        for _ in 0..trials {
            let (drawn, _) = pool.partial_shuffle(rng, needed);
            self.resolve(drawn, &mut tally);
        }
        tally
    }

    fn resolve(&self, drawn: &[Card], tally: &mut Tally) {
        let missing = 5 - self.board.len();
        let mut full = [self.hole.first(); 5];
        full[..self.board.len()].copy_from_slice(&self.board);
        full[self.board.len()..].copy_from_slice(&drawn[..missing]);

        let hero = best_with(&self.hole, &full);
        let mut best_other: Option<HandResult> = None;
        let dealt = drawn[missing..].chunks_exact(2).map(|c| [c[0], c[1]]);
        let known = self.known.iter().map(HoleCards::as_array);
        for opp in known.chain(dealt) {
            let r = best_with_cards(opp, &full);
            if best_other.map_or(true, |b| r > b) {
                best_other = Some(r);
            }
        }
        match best_other.map(|b| hero.cmp(&b)) {
            None | Some(core::cmp::Ordering::Greater) => tally.win += 1,
            Some(core::cmp::Ordering::Equal) => tally.tie += 1,
            Some(core::cmp::Ordering::Less) => tally.loss += 1,
        }
    }
}

fn best_with(hole: &HoleCards, board: &[Card; 5]) -> HandResult {
    best_with_cards(hole.as_array(), board)
}

fn best_with_cards(hole: [Card; 2], board: &[Card; 5]) -> HandResult {
    evaluate_seven(&[hole[0], hole[1], board[0], board[1], board[2], board[3], board[4]])
}

/// Monte Carlo equity estimator with a fixed trial budget.
///
/// ```
/// use holdem_rs::equity::EquityCalculator;
/// use holdem_rs::hand::{Board, HoleCards};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let hole: HoleCards = "As Ad".parse().unwrap();
/// let eq = EquityCalculator::new(500).estimate(&hole, &Board::empty(), 1, &mut rng).unwrap();
/// assert!(eq.win > 0.7);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EquityCalculator {
    trials: u32,
}

impl Default for EquityCalculator {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl EquityCalculator {
    pub fn new(trials: u32) -> Self {
        Self { trials: trials.max(1) }
    }

    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Equity against `opponents` players whose cards are unknown.
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        hole: &HoleCards,
        board: &Board,
        opponents: usize,
        rng: &mut R,
    ) -> Result<Equity, EquityError> {
        self.estimate_against(hole, board, &[], opponents, rng)
    }

    /// Equity against some opponents with exposed cards plus `random_opponents` unknown ones.
    pub fn estimate_against<R: Rng + ?Sized>(
        &self,
        hole: &HoleCards,
        board: &Board,
        known: &[HoleCards],
        random_opponents: usize,
        rng: &mut R,
    ) -> Result<Equity, EquityError> {
        let scenario = build_scenario(hole, board, known, random_opponents)?;

        if known.is_empty() && random_opponents == 0 {
            return Ok(Equity { win: 1.0, tie: 0.0, loss: 0.0, trials: 1 });
        }
        let tally = if scenario.needed() == 0 {
            let mut t = Tally::default();
            scenario.resolve(&[], &mut t);
            t
        } else {
            self.sample(&scenario, rng)
        };
        let equity = Equity::from_tally(tally);
        tracing::trace!(
            trials = equity.trials,
            opponents = known.len() + random_opponents,
            win = equity.win,
            tie = equity.tie,
            "equity estimate"
        );
        Ok(equity)
    }

    #[cfg(not(feature = "parallel"))]
    fn sample<R: Rng + ?Sized>(&self, scenario: &Scenario, rng: &mut R) -> Tally {
        scenario.run(self.trials, rng)
    }

    /// Splits the budget into chunks, each with its own stream seeded from `rng`.
    #[cfg(feature = "parallel")]
    fn sample<R: Rng + ?Sized>(&self, scenario: &Scenario, rng: &mut R) -> Tally {
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;
        use rayon::prelude::*;

        const CHUNK: u32 = 256;
        let chunks = (self.trials + CHUNK - 1) / CHUNK;
        let jobs: Vec<(u64, u32)> = (0..chunks)
            .map(|i| (rng.random::<u64>(), CHUNK.min(self.trials - i * CHUNK)))
            .collect();
        jobs.into_par_iter()
            .map(|(seed, n)| scenario.run(n, &mut ChaCha8Rng::seed_from_u64(seed)))
            .reduce(Tally::default, Tally::merge)
    }
}

fn build_scenario(
    hole: &HoleCards,
    board: &Board,
    known: &[HoleCards],
    random_opponents: usize,
) -> Result<Scenario, EquityError> {
    validate_holdem(hole, board).map_err(|e| EquityError::InvalidInput(e.to_string()))?;
    let mut used = hole.mask() | board.mask();
    for opp in known {
        if used & opp.mask() != 0 {
            return Err(EquityError::InvalidInput(format!("opponent cards {opp} already in use")));
        }
        used |= opp.mask();
    }
    let unseen = remaining_cards(used);
    let scenario = Scenario {
        hole: *hole,
        board: board.as_slice().to_vec(),
        known: known.to_vec(),
        random_opponents,
        unseen,
    };
    let needed = scenario.needed();
    if needed > scenario.unseen.len() {
        return Err(EquityError::InsufficientCards { needed, available: scenario.unseen.len() });
    }
    Ok(scenario)
}
