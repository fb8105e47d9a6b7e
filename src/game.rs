use crate::cards::Card;
use crate::deck::{Deck, DeckError};
use crate::evaluator::{evaluate_holdem, Category, EvalError, HandResult};
use crate::hand::{Board, HandError, HoleCards};
use crate::pot::{clockwise_from_dealer, side_pots, split_amount, Contribution, PotState};
use crate::stats::{ActionKind, PlayerStats};
use core::fmt;
use core::ops::RangeInclusive;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlayerStatus {
    Active,
    Folded,
    AllIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    HandComplete,
}

impl Street {
    /// Whether players act on this street.
    pub fn is_betting(self) -> bool {
        matches!(self, Street::PreFlop | Street::Flop | Street::Turn | Street::River)
    }

    pub fn name(self) -> &'static str {
        match self {
            Street::PreFlop => "Pre-flop",
            Street::Flop => "Flop",
            Street::Turn => "Turn",
            Street::River => "River",
            Street::Showdown => "Showdown",
            Street::HandComplete => "Hand complete",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A player decision. `Bet` and `Raise` carry the total this-street amount, not the increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(u64),
    Raise(u64),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => f.write_str("fold"),
            Action::Check => f.write_str("check"),
            Action::Call => f.write_str("call"),
            Action::Bet(n) => write!(f, "bet {n}"),
            Action::Raise(n) => write!(f, "raise to {n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandHistoryVerb {
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    Bet,
    RaiseTo,
    Win,
    Split,
}

impl HandHistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HandHistoryVerb::SmallBlind => "SB",
            HandHistoryVerb::BigBlind => "BB",
            HandHistoryVerb::Fold => "Fold",
            HandHistoryVerb::Check => "Check",
            HandHistoryVerb::Call => "Call",
            HandHistoryVerb::Bet => "Bet",
            HandHistoryVerb::RaiseTo => "Raise to",
            HandHistoryVerb::Win => "Win",
            HandHistoryVerb::Split => "Split",
        }
    }
}

/// Rejected actions. The game state is untouched whenever one of these is returned,
/// except for `Showdown`, which reports a broken invariant while resolving the hand.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("illegal action: no hand in progress")]
    HandNotInProgress,
    #[error("illegal action: player is not active")]
    PlayerNotActive,
    #[error("illegal action: cannot check facing {to_call}")]
    CannotCheck { to_call: u64 },
    #[error("illegal action: nothing to call")]
    NothingToCall,
    #[error("illegal action: betting is not allowed here")]
    BetNotAllowed,
    #[error("illegal action: raising is not allowed here")]
    RaiseNotAllowed,
    #[error("illegal action: amount too small: min {min}, got {got}")]
    AmountTooSmall { min: u64, got: u64 },
    #[error("illegal action: amount too large: max {max}, got {got}")]
    AmountTooLarge { max: u64, got: u64 },
    #[error(transparent)]
    Showdown(#[from] ShowdownError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShowdownError {
    #[error("hand evaluation failed: {0}")]
    Evaluation(#[from] EvalError),
    #[error("invalid game state: {0}")]
    InvalidState(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandStartError {
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("need two players with chips, have {0}")]
    NotEnoughPlayers(usize),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Showdown(#[from] ShowdownError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HandHistoryEntry {
    pub seat: usize,
    pub verb: HandHistoryVerb,
    pub amount: Option<u64>,
    pub street: Street,
}

/// What the player to act may do right now.
///
/// ```
/// use holdem_rs::game::{Action, Game};
///
/// let mut game = Game::new(3, 1000, 5, 10);
/// game.start_hand(&mut rand::rng()).unwrap();
/// let legal = game.legal_actions();
/// assert!(legal.permits(Action::Call));
/// assert!(!legal.permits(Action::Check));
/// assert!(legal.permits(Action::Raise(20)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegalActions {
    pub fold: bool,
    pub check: bool,
    /// Chips a call would put in; capped by the stack.
    pub call: Option<u64>,
    /// Legal totals for an opening bet.
    pub bet: Option<RangeInclusive<u64>>,
    /// Legal totals to raise to.
    pub raise: Option<RangeInclusive<u64>>,
    pub to_call: u64,
}

impl LegalActions {
    pub fn is_empty(&self) -> bool {
        !self.fold && !self.check && self.call.is_none() && self.bet.is_none() && self.raise.is_none()
    }

    pub fn permits(&self, action: Action) -> bool {
        self.validate(action).is_ok()
    }

    pub fn validate(&self, action: Action) -> Result<(), ActionError> {
        if self.is_empty() {
            return Err(ActionError::HandNotInProgress);
        }
        match action {
            Action::Fold => Ok(()),
            Action::Check if self.check => Ok(()),
            Action::Check => Err(ActionError::CannotCheck { to_call: self.to_call }),
            Action::Call => self.call.map(|_| ()).ok_or(ActionError::NothingToCall),
            Action::Bet(amount) => {
                in_range(self.bet.as_ref().ok_or(ActionError::BetNotAllowed)?, amount)
            }
            Action::Raise(to) => {
                in_range(self.raise.as_ref().ok_or(ActionError::RaiseNotAllowed)?, to)
            }
        }
    }
}

fn in_range(range: &RangeInclusive<u64>, got: u64) -> Result<(), ActionError> {
    if got < *range.start() {
        Err(ActionError::AmountTooSmall { min: *range.start(), got })
    } else if got > *range.end() {
        Err(ActionError::AmountTooLarge { max: *range.end(), got })
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Player {
    pub(crate) name: String,
    pub(crate) stack: u64,
    pub(crate) bet: u64,
    pub(crate) contributed: u64,
    pub(crate) status: PlayerStatus,
    pub(crate) hole: Option<HoleCards>,
    pub(crate) acted: bool,
    pub(crate) last_action: Option<String>,
    pub(crate) stats: PlayerStats,
}

impl Player {
    pub fn new(name: impl Into<String>, stack: u64) -> Self {
        Self {
            name: name.into(),
            stack,
            bet: 0,
            contributed: 0,
            status: PlayerStatus::Folded,
            hole: None,
            acted: false,
            last_action: None,
            stats: PlayerStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stack(&self) -> u64 {
        self.stack
    }

    /// Chips committed on the current street.
    pub fn bet(&self) -> u64 {
        self.bet
    }

    /// Chips committed this hand.
    pub fn contributed(&self) -> u64 {
        self.contributed
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn hole(&self) -> Option<HoleCards> {
        self.hole
    }

    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Still holding cards in the current hand.
    pub fn is_live(&self) -> bool {
        !matches!(self.status, PlayerStatus::Folded) && self.hole.is_some()
    }
}

/// Read-only picture of the hand for display and bots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    pub hand_number: u32,
    pub street: Street,
    pub dealer: usize,
    pub small_blind_seat: Option<usize>,
    pub big_blind_seat: Option<usize>,
    pub to_act: Option<usize>,
    pub board: Vec<Card>,
    pub pot: PotState,
    pub history: Vec<HandHistoryEntry>,
}

/// Single-table no-limit betting state machine.
#[derive(Debug)]
#[non_exhaustive]
pub struct Game {
    pub(crate) small_blind: u64,
    pub(crate) big_blind: u64,

    pub(crate) deck: Deck,
    pub(crate) board: Board,
    pub(crate) players: Vec<Player>,
    pub(crate) pot: PotState,
    pub(crate) dealer: usize,
    pub(crate) current: usize,
    pub(crate) street: Street,
    pub(crate) sb_pos: Option<usize>,
    pub(crate) bb_pos: Option<usize>,
    pub(crate) hands_started: u32,

    /// Seats paid in the last hand, clockwise from the dealer.
    pub(crate) winners: Vec<usize>,
    pub(crate) payouts: Vec<u64>,
    /// Hands revealed at showdown (None if folded or uncontested).
    pub(crate) showdown_results: Vec<Option<HandResult>>,
    hand_history: Vec<HandHistoryEntry>,
}

impl Game {
    pub fn new(num_players: usize, starting_stack: u64, small_blind: u64, big_blind: u64) -> Self {
        let players = (1..=num_players).map(|i| Player::new(format!("P{i}"), starting_stack)).collect();
        Self::with_players(players, small_blind, big_blind)
    }

    pub fn with_players(players: Vec<Player>, small_blind: u64, big_blind: u64) -> Self {
        let n = players.len();
        Self {
            small_blind,
            big_blind,
            deck: Deck::standard(),
            board: Board::empty(),
            players,
            pot: PotState::new(big_blind),
            dealer: 0,
            current: 0,
            street: Street::HandComplete,
            sb_pos: None,
            bb_pos: None,
            hands_started: 0,
            winners: Vec::new(),
            payouts: vec![0; n],
            showdown_results: vec![None; n],
            hand_history: Vec::new(),
        }
    }

    pub fn small_blind(&self) -> u64 {
        self.small_blind
    }

    pub fn big_blind(&self) -> u64 {
        self.big_blind
    }

    /// New blind amounts, used from the next hand on.
    pub fn set_blinds(&mut self, small_blind: u64, big_blind: u64) {
        self.small_blind = small_blind;
        self.big_blind = big_blind;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    pub fn pot(&self) -> PotState {
        self.pot
    }

    pub fn dealer(&self) -> usize {
        self.dealer
    }

    pub fn street(&self) -> Street {
        self.street
    }

    /// Number of hands dealt so far, including the one in progress.
    pub fn hand_number(&self) -> u32 {
        self.hands_started
    }

    pub fn sb_pos(&self) -> Option<usize> {
        self.sb_pos
    }

    pub fn bb_pos(&self) -> Option<usize> {
        self.bb_pos
    }

    /// Seat whose decision is pending, if betting is open.
    pub fn to_act(&self) -> Option<usize> {
        self.street.is_betting().then_some(self.current)
    }

    pub fn in_progress(&self) -> bool {
        !matches!(self.street, Street::HandComplete)
    }

    pub fn winners(&self) -> &[usize] {
        &self.winners
    }

    /// Chips each seat received when the last hand was settled.
    pub fn payouts(&self) -> &[u64] {
        &self.payouts
    }

    /// Each seat's best hand from the last showdown.
    pub fn showdown_results(&self) -> &[Option<HandResult>] {
        &self.showdown_results
    }

    pub fn showdown_categories(&self) -> Vec<Option<Category>> {
        self.showdown_results.iter().map(|r| r.map(|r| r.category)).collect()
    }

    /// Hands shown at the last showdown, best first. Equal hands keep clockwise
    /// order from the dealer.
    pub fn showdown_ranking(&self) -> Vec<(usize, HandResult)> {
        let n = self.players.len();
        let mut seats: Vec<usize> = (0..n).collect();
        clockwise_from_dealer(&mut seats, self.dealer, n);
        let mut ranked: Vec<(usize, HandResult)> = seats
            .into_iter()
            .filter_map(|s| self.showdown_results.get(s).copied().flatten().map(|r| (s, r)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Seats by chip count, largest first; equal stacks keep seat order.
    pub fn standings(&self) -> Vec<usize> {
        let mut seats: Vec<usize> = (0..self.players.len()).collect();
        seats.sort_by(|&a, &b| self.players[b].stack.cmp(&self.players[a].stack));
        seats
    }

    /// Stacks plus the pot. Constant for the life of a hand.
    pub fn total_chips(&self) -> u64 {
        self.players.iter().map(|p| p.stack).sum::<u64>() + self.pot.total
    }

    /// Live players other than `seat`.
    pub fn live_opponents(&self, seat: usize) -> usize {
        self.players.iter().enumerate().filter(|(i, p)| *i != seat && p.is_live()).count()
    }

    pub fn history(&self) -> &[HandHistoryEntry] {
        &self.hand_history
    }

    pub fn history_recent_offset(&self, n: usize, offset: usize) -> Vec<HandHistoryEntry> {
        let len = self.hand_history.len();
        if n == 0 || len == 0 {
            return Vec::new();
        }
        let offset = offset.min(len.saturating_sub(n));
        let end = len - offset;
        let start = end.saturating_sub(n);
        self.hand_history[start..end].to_vec()
    }

    pub fn round_state(&self) -> RoundState {
        RoundState {
            hand_number: self.hands_started,
            street: self.street,
            dealer: self.dealer,
            small_blind_seat: self.sb_pos,
            big_blind_seat: self.bb_pos,
            to_act: self.to_act(),
            board: self.board.as_slice().to_vec(),
            pot: self.pot,
            history: self.hand_history.clone(),
        }
    }

    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Resume a table mid-session: `dealer` is the seat that dealt the last hand.
    pub(crate) fn restore_position(&mut self, dealer: usize, hands_started: u32) {
        self.dealer = if self.players.is_empty() { 0 } else { dealer % self.players.len() };
        self.hands_started = hands_started;
    }

    pub fn to_call(&self, seat: usize) -> u64 {
        if !self.street.is_betting() {
            return 0;
        }
        self.players.get(seat).map_or(0, |p| self.pot.current_bet.saturating_sub(p.bet))
    }

    /// Shuffle a fresh deck from `rng` and deal a new hand.
    pub fn start_hand<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), HandStartError> {
        self.start_hand_with_deck(Deck::shuffled(rng))
    }

    /// Deal a new hand from `deck`. Hole cards go two at a time to each seated player,
    /// starting left of the dealer; the board follows with no burn cards.
    pub fn start_hand_with_deck(&mut self, deck: Deck) -> Result<(), HandStartError> {
        if self.in_progress() {
            return Err(HandStartError::HandInProgress);
        }
        let funded = self.players.iter().filter(|p| p.stack > 0).count();
        if funded < 2 {
            return Err(HandStartError::NotEnoughPlayers(funded));
        }
        if self.hands_started > 0 {
            self.dealer = (self.dealer + 1) % self.players.len();
        }
        self.reset_players_for_new_hand();
        self.align_dealer_to_eligible();

        let n = self.players.len();
        self.deck = deck;
        self.board = Board::empty();
        self.pot = PotState::new(self.big_blind);
        self.hand_history.clear();
        self.winners.clear();
        self.payouts = vec![0; n];
        self.showdown_results = vec![None; n];
        self.hands_started += 1;
        self.street = Street::PreFlop;

        self.deal_hole_cards()?;
        let bb = self.setup_preflop();
        tracing::info!(
            hand = self.hands_started,
            dealer = self.dealer,
            players = funded,
            "hand started"
        );
        self.progress(bb)?;
        Ok(())
    }

    fn reset_players_for_new_hand(&mut self) {
        for p in &mut self.players {
            p.bet = 0;
            p.contributed = 0;
            p.hole = None;
            p.acted = false;
            p.last_action = None;
            p.status = if p.stack == 0 { PlayerStatus::Folded } else { PlayerStatus::Active };
        }
    }

    fn align_dealer_to_eligible(&mut self) {
        let n = self.players.len();
        for _ in 0..n {
            if self.is_eligible(self.dealer) {
                break;
            }
            self.dealer = (self.dealer + 1) % n;
        }
    }

    fn deal_hole_cards(&mut self) -> Result<(), HandStartError> {
        let n = self.players.len();
        for offset in 1..=n {
            let seat = (self.dealer + offset) % n;
            if self.is_eligible(seat) {
                let cards = self.deck.deal(2)?;
                self.players[seat].hole = Some(HoleCards::from_slice(&cards)?);
            }
        }
        Ok(())
    }

    /// Posts blinds and returns the big blind seat; action starts after it.
    fn setup_preflop(&mut self) -> usize {
        let (sb, bb) = if self.count_eligible() == 2 {
            // Heads-up: the dealer posts the small blind and acts first pre-flop.
            (self.dealer, self.next_eligible_from(self.dealer))
        } else {
            let sb = self.next_eligible_from(self.dealer);
            (sb, self.next_eligible_from(sb))
        };
        self.sb_pos = Some(sb);
        self.bb_pos = Some(bb);
        let sb_paid = self.post_blind(sb, self.small_blind, HandHistoryVerb::SmallBlind);
        let bb_paid = self.post_blind(bb, self.big_blind, HandHistoryVerb::BigBlind);
        self.pot.current_bet = sb_paid.max(bb_paid);
        self.pot.min_raise = self.big_blind.max(1);
        self.current = bb;
        bb
    }

    fn post_blind(&mut self, seat: usize, amount: u64, verb: HandHistoryVerb) -> u64 {
        let paid = self.commit(seat, amount);
        self.players[seat].last_action = Some(format!("{} {paid}", verb.label()));
        self.record_history(seat, verb, Some(paid));
        paid
    }

    /// Move up to `amount` from the seat's stack into the pot.
    fn commit(&mut self, seat: usize, amount: u64) -> u64 {
        let p = &mut self.players[seat];
        let pay = p.stack.min(amount);
        p.stack -= pay;
        p.bet += pay;
        p.contributed += pay;
        if p.stack == 0 {
            p.status = PlayerStatus::AllIn;
        }
        self.pot.collect(pay);
        pay
    }

    fn is_eligible(&self, seat: usize) -> bool {
        matches!(self.players[seat].status, PlayerStatus::Active)
    }

    fn count_eligible(&self) -> usize {
        self.players.iter().filter(|p| matches!(p.status, PlayerStatus::Active)).count()
    }

    fn live_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_live()).count()
    }

    fn next_eligible_from(&self, start: usize) -> usize {
        let n = self.players.len();
        (1..=n).map(|i| (start + i) % n).find(|&s| self.is_eligible(s)).unwrap_or(start % n)
    }

    /// Next active seat after `from` that still owes a decision.
    fn next_to_act(&self, from: usize) -> usize {
        let n = self.players.len();
        let cb = self.pot.current_bet;
        (1..=n)
            .map(|i| (from + i) % n)
            .find(|&s| {
                let p = &self.players[s];
                self.is_eligible(s) && (!p.acted || p.bet < cb)
            })
            .unwrap_or(from)
    }

    pub fn legal_actions(&self) -> LegalActions {
        let Some(seat) = self.to_act() else {
            return LegalActions::default();
        };
        let p = &self.players[seat];
        if !matches!(p.status, PlayerStatus::Active) {
            return LegalActions::default();
        }
        let to_call = self.to_call(seat);
        let cb = self.pot.current_bet;
        let max_total = p.bet + p.stack;
        let min_bet = self.big_blind.max(1);
        let min_raise_to = cb + self.pot.min_raise;
        // A stack short of the minimum may still move all in. A seat that already acted
        // and was only re-approached by a short all-in may call but not raise.
        LegalActions {
            fold: true,
            check: to_call == 0,
            call: (to_call > 0).then(|| to_call.min(p.stack)),
            bet: (cb == 0 && p.stack > 0).then(|| min_bet.min(max_total)..=max_total),
            raise: (cb > 0 && max_total > cb && !p.acted)
                .then(|| min_raise_to.min(max_total)..=max_total),
            to_call,
        }
    }

    /// Apply the pending player's action. On error nothing changes.
    ///
    /// ```
    /// use holdem_rs::game::{Action, ActionError, Game};
    ///
    /// let mut game = Game::new(2, 100, 5, 10);
    /// game.start_hand(&mut rand::rng()).unwrap();
    /// let before = game.round_state();
    /// assert!(matches!(game.apply(Action::Check), Err(ActionError::CannotCheck { to_call: 5 })));
    /// assert_eq!(game.round_state(), before);
    /// game.apply(Action::Call).unwrap();
    /// ```
    pub fn apply(&mut self, action: Action) -> Result<(), ActionError> {
        let seat = self.to_act().ok_or(ActionError::HandNotInProgress)?;
        if !self.is_eligible(seat) {
            return Err(ActionError::PlayerNotActive);
        }
        let legal = self.legal_actions();
        legal.validate(action)?;

        let (verb, amount, kind) = match action {
            Action::Fold => {
                self.players[seat].status = PlayerStatus::Folded;
                (HandHistoryVerb::Fold, None, ActionKind::Fold)
            }
            Action::Check => (HandHistoryVerb::Check, None, ActionKind::Check),
            Action::Call => {
                let paid = self.commit(seat, legal.to_call);
                (HandHistoryVerb::Call, Some(paid), ActionKind::Call)
            }
            Action::Bet(to) | Action::Raise(to) => {
                let need = to - self.players[seat].bet;
                self.commit(seat, need);
                if self.pot.raise_to(to) {
                    for (i, p) in self.players.iter_mut().enumerate() {
                        if i != seat {
                            p.acted = false;
                        }
                    }
                }
                if matches!(action, Action::Bet(_)) {
                    (HandHistoryVerb::Bet, Some(to), ActionKind::Bet)
                } else {
                    (HandHistoryVerb::RaiseTo, Some(to), ActionKind::Raise)
                }
            }
        };

        let p = &mut self.players[seat];
        p.acted = true;
        p.last_action = Some(match amount {
            Some(a) => format!("{} {a}", verb.label()),
            None => verb.label().to_string(),
        });
        let all_in = matches!(p.status, PlayerStatus::AllIn);
        p.stats.record_action(kind, all_in);
        self.record_history(seat, verb, amount);
        tracing::debug!(seat, %action, street = %self.street, pot = self.pot.total, "action applied");

        self.progress(seat)?;
        Ok(())
    }

    /// Advance after `from` has acted: next player, next street, or settlement.
    fn progress(&mut self, from: usize) -> Result<(), ShowdownError> {
        if self.live_count() <= 1 {
            return self.award_uncontested();
        }
        let cb = self.pot.current_bet;
        let active: Vec<usize> = (0..self.players.len()).filter(|&s| self.is_eligible(s)).collect();
        let round_over = match active.as_slice() {
            [] => true,
            // Nobody left to bet against; the last active player only needs to match.
            [only] => self.players[*only].bet >= cb,
            _ => active.iter().all(|&s| self.players[s].acted && self.players[s].bet == cb),
        };
        if !round_over {
            self.current = self.next_to_act(from);
            return Ok(());
        }
        if active.len() <= 1 {
            return self.run_out_and_showdown();
        }
        let (next, cards) = match self.street {
            Street::PreFlop => (Street::Flop, 3),
            Street::Flop => (Street::Turn, 1),
            Street::Turn => (Street::River, 1),
            _ => return self.showdown(),
        };
        self.deal_board(cards)?;
        self.street = next;
        self.begin_street();
        tracing::debug!(street = %self.street, board = %self.board, "street dealt");
        Ok(())
    }

    fn deal_board(&mut self, n: usize) -> Result<(), ShowdownError> {
        let cards = self.deck.deal(n).map_err(|e| ShowdownError::InvalidState(e.to_string()))?;
        self.board.extend(cards);
        Ok(())
    }

    fn begin_street(&mut self) {
        for p in &mut self.players {
            p.bet = 0;
            p.acted = false;
        }
        self.pot.new_street(self.big_blind);
        self.current = self.next_to_act(self.dealer);
    }

    fn run_out_and_showdown(&mut self) -> Result<(), ShowdownError> {
        let missing = 5 - self.board.len();
        if missing > 0 {
            self.deal_board(missing)?;
        }
        self.showdown()
    }

    fn award_uncontested(&mut self) -> Result<(), ShowdownError> {
        let winner = self
            .players
            .iter()
            .position(Player::is_live)
            .ok_or_else(|| ShowdownError::InvalidState("no live player to award".into()))?;
        self.street = Street::Showdown;
        let amount = self.pot.take_all();
        let mut payouts = vec![0; self.players.len()];
        payouts[winner] = amount;
        self.credit(winner, amount, false);
        self.complete_hand(payouts, amount);
        Ok(())
    }

    fn showdown(&mut self) -> Result<(), ShowdownError> {
        self.street = Street::Showdown;
        let n = self.players.len();
        let mut results: Vec<Option<HandResult>> = vec![None; n];
        for (seat, p) in self.players.iter().enumerate() {
            if let (true, Some(hole)) = (p.is_live(), p.hole) {
                results[seat] = Some(evaluate_holdem(&hole, &self.board)?);
            }
        }
        let contributions: Vec<Contribution> = self
            .players
            .iter()
            .enumerate()
            .map(|(seat, p)| Contribution { seat, amount: p.contributed, live: results[seat].is_some() })
            .collect();

        let mut payouts = vec![0u64; n];
        let mut split = vec![false; n];
        for pot in side_pots(&contributions) {
            let best = pot.eligible.iter().filter_map(|&s| results[s]).max();
            let mut winners: Vec<usize> =
                pot.eligible.iter().copied().filter(|&s| results[s] == best).collect();
            clockwise_from_dealer(&mut winners, self.dealer, n);
            for (seat, amount) in split_amount(pot.amount, &winners) {
                payouts[seat] += amount;
                split[seat] |= winners.len() > 1;
            }
        }

        let total = self.pot.take_all();
        let paid: u64 = payouts.iter().sum();
        if paid != total {
            return Err(ShowdownError::InvalidState(format!("paid {paid} from a pot of {total}")));
        }
        for seat in 0..n {
            if payouts[seat] > 0 {
                self.credit(seat, payouts[seat], split[seat]);
            }
        }
        self.showdown_results = results;
        self.complete_hand(payouts, total);
        Ok(())
    }

    fn credit(&mut self, seat: usize, amount: u64, split: bool) {
        let verb = if split { HandHistoryVerb::Split } else { HandHistoryVerb::Win };
        let p = &mut self.players[seat];
        p.stack += amount;
        p.last_action = Some(format!("{} {amount}", verb.label()));
        self.record_history(seat, verb, Some(amount));
    }

    fn complete_hand(&mut self, payouts: Vec<u64>, pot: u64) {
        let n = self.players.len();
        for (seat, p) in self.players.iter_mut().enumerate() {
            if p.hole.is_some() {
                let shown = self.showdown_results[seat].map(|r| r.category);
                p.stats.record_hand(p.contributed, payouts[seat], shown);
            }
            p.bet = 0;
        }
        let mut winners: Vec<usize> = (0..n).filter(|&s| payouts[s] > 0).collect();
        clockwise_from_dealer(&mut winners, self.dealer, n);
        self.winners = winners;
        self.payouts = payouts;
        self.pot.new_street(self.big_blind);
        self.street = Street::HandComplete;
        tracing::info!(hand = self.hands_started, winners = ?self.winners, pot, "hand complete");
    }

    fn record_history(&mut self, seat: usize, verb: HandHistoryVerb, amount: Option<u64>) {
        self.hand_history.push(HandHistoryEntry { seat, verb, amount, street: self.street });
    }
}
