//! Rule-based opponents.
//!
//! A bot is data (`BotProfile`) plus one pure decision function. The composite
//! score is `(win probability - pot odds)` nudged by made-hand strength and a
//! noise term whose width comes from personality and style. Style also sets
//! the fold and raise thresholds, and difficulty sets how often the bot
//! ignores all of that and errs.

use crate::engine::GameEngine;
use crate::equity::EquityCalculator;
use crate::evaluator::{evaluate_holdem, EvalError};
use crate::game::{Action, ActionError, LegalActions};
use crate::hand::{Board, HoleCards};
use core::ops::RangeInclusive;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::{AgentError, AgentKind, PlayerAgent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Personality {
    Tight,
    Loose,
    Unpredictable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Conservative,
    Balanced,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Personality {
    pub const ALL: [Personality; 3] =
        [Personality::Tight, Personality::Loose, Personality::Unpredictable];
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Conservative, Style::Balanced, Style::Aggressive];
}

/// Read-only bot configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotProfile {
    pub personality: Personality,
    pub style: Style,
    pub difficulty: Difficulty,
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::new(Personality::Tight, Style::Balanced, Difficulty::Medium)
    }
}

impl BotProfile {
    pub fn new(personality: Personality, style: Style, difficulty: Difficulty) -> Self {
        Self { personality, style, difficulty }
    }

    /// A profile drawn from the styles and personalities that fit `difficulty`.
    /// Easy bots are never aggressive or erratic; hard bots are never passive or loose.
    pub fn random_for<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Self {
        let (styles, personalities): (&[Style], &[Personality]) = match difficulty {
            Difficulty::Easy => (
                &[Style::Conservative, Style::Balanced],
                &[Personality::Tight, Personality::Loose],
            ),
            Difficulty::Medium => (&Style::ALL, &Personality::ALL),
            Difficulty::Hard => (
                &[Style::Aggressive, Style::Balanced],
                &[Personality::Tight, Personality::Unpredictable],
            ),
        };
        Self {
            personality: personalities.choose(rng).copied().unwrap_or(Personality::Tight),
            style: styles.choose(rng).copied().unwrap_or(Style::Balanced),
            difficulty,
        }
    }

    pub fn describe(&self) -> String {
        format!("{:?} {:?} ({:?})", self.personality, self.style, self.difficulty)
    }
}

/// Named probabilities behind bot randomness. Loaded from config; defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotTuning {
    /// Chance per decision of picking a random legal action instead.
    pub mistake_easy: f64,
    pub mistake_medium: f64,
    pub mistake_hard: f64,
    /// Base chance of betting or raising without the score for it.
    pub bluff_tight: f64,
    pub bluff_loose: f64,
    pub bluff_unpredictable: f64,
    /// Half-width of the uniform noise added to the score.
    pub noise_tight: f64,
    pub noise_loose: f64,
    pub noise_unpredictable: f64,
    /// Multiplier on the noise width for Conservative bots.
    pub conservative_noise_scale: f64,
    /// Weight of made-hand strength relative to equity.
    pub strength_weight: f64,
}

impl Default for BotTuning {
    fn default() -> Self {
        Self {
            mistake_easy: 0.20,
            mistake_medium: 0.08,
            mistake_hard: 0.02,
            bluff_tight: 0.03,
            bluff_loose: 0.08,
            bluff_unpredictable: 0.15,
            noise_tight: 0.02,
            noise_loose: 0.06,
            noise_unpredictable: 0.20,
            conservative_noise_scale: 0.5,
            strength_weight: 0.25,
        }
    }
}

impl BotTuning {
    pub fn mistake_rate(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.mistake_easy,
            Difficulty::Medium => self.mistake_medium,
            Difficulty::Hard => self.mistake_hard,
        }
    }

    /// Personality sets the base rate; harder bots bluff more.
    pub fn bluff_rate(&self, profile: &BotProfile) -> f64 {
        let base = match profile.personality {
            Personality::Tight => self.bluff_tight,
            Personality::Loose => self.bluff_loose,
            Personality::Unpredictable => self.bluff_unpredictable,
        };
        let scale = match profile.difficulty {
            Difficulty::Easy => 0.5,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.5,
        };
        (base * scale).clamp(0.0, 1.0)
    }

    /// Personality sets the width; Conservative play narrows it.
    pub fn noise(&self, profile: &BotProfile) -> f64 {
        let width = match profile.personality {
            Personality::Tight => self.noise_tight,
            Personality::Loose => self.noise_loose,
            Personality::Unpredictable => self.noise_unpredictable,
        };
        match profile.style {
            Style::Conservative => width * self.conservative_noise_scale,
            Style::Balanced | Style::Aggressive => width,
        }
    }
}

/// Everything the decision needs about the spot.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionInput {
    /// Made-hand strength in [0, 1].
    pub strength: f64,
    /// Estimated probability of winning outright.
    pub win_probability: f64,
    pub pot: u64,
    pub current_bet: u64,
    pub to_call: u64,
    pub stack: u64,
    pub legal: LegalActions,
}

impl DecisionInput {
    /// `to_call / (pot + to_call)`; zero when checking is free.
    pub fn pot_odds(&self) -> f64 {
        if self.to_call == 0 {
            0.0
        } else {
            self.to_call as f64 / (self.pot + self.to_call) as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    Value,
    Bluff,
    Passive,
    Fold,
    Mistake,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotDecision {
    pub action: Action,
    pub score: f64,
    pub reason: DecisionReason,
}

fn thresholds(profile: &BotProfile) -> (f64, f64) {
    let (fold, raise) = match profile.style {
        Style::Conservative => (-0.02, 0.25),
        Style::Balanced => (-0.06, 0.18),
        Style::Aggressive => (-0.10, 0.12),
    };
    let loose = if matches!(profile.personality, Personality::Loose) { 0.04 } else { 0.0 };
    (fold - loose, raise)
}

/// Choose an action for the spot. The result is always permitted by `input.legal`.
///
/// ```
/// use holdem_rs::agents::{decide, BotProfile, BotTuning, DecisionInput};
/// use holdem_rs::game::{Action, LegalActions};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let input = DecisionInput {
///     strength: 0.1,
///     win_probability: 0.05,
///     pot: 100,
///     current_bet: 50,
///     to_call: 50,
///     stack: 500,
///     legal: LegalActions { fold: true, call: Some(50), raise: Some(100..=550), to_call: 50, ..Default::default() },
/// };
/// let tuning = BotTuning { mistake_medium: 0.0, bluff_tight: 0.0, ..BotTuning::default() };
/// let mut rng = ChaCha8Rng::seed_from_u64(3);
/// let d = decide(&input, &BotProfile::default(), &tuning, &mut rng);
/// assert_eq!(d.action, Action::Fold);
/// ```
pub fn decide<R: Rng + ?Sized>(
    input: &DecisionInput,
    profile: &BotProfile,
    tuning: &BotTuning,
    rng: &mut R,
) -> BotDecision {
    let legal = &input.legal;
    let noise_width = tuning.noise(profile);
    let noise = if noise_width > 0.0 { rng.random_range(-noise_width..=noise_width) } else { 0.0 };
    let score = (input.win_probability - input.pot_odds())
        + tuning.strength_weight * (input.strength - 0.5)
        + noise;

    if rng.random::<f64>() < tuning.mistake_rate(profile.difficulty) {
        let action = random_legal(legal, rng);
        return finish(action, score, DecisionReason::Mistake, legal);
    }

    let (fold_at, raise_at) = thresholds(profile);
    let can_aggress = legal.bet.is_some() || legal.raise.is_some();
    if score >= raise_at && can_aggress {
        let magnitude = ((score - raise_at) / 0.5).clamp(0.0, 1.0);
        let action = aggressive_action(input, magnitude);
        return finish(action, score, DecisionReason::Value, legal);
    }
    if can_aggress && rng.random::<f64>() < tuning.bluff_rate(profile) {
        let action = aggressive_action(input, 0.0);
        return finish(action, score, DecisionReason::Bluff, legal);
    }
    if score < fold_at && !legal.check {
        return finish(Action::Fold, score, DecisionReason::Fold, legal);
    }
    finish(passive_action(legal), score, DecisionReason::Passive, legal)
}

fn passive_action(legal: &LegalActions) -> Action {
    if legal.check {
        Action::Check
    } else if legal.call.is_some() {
        Action::Call
    } else {
        Action::Fold
    }
}

/// Bet or raise sized between half and one-and-a-half pots by `magnitude`.
fn aggressive_action(input: &DecisionInput, magnitude: f64) -> Action {
    let fraction = 0.5 + magnitude;
    let pot_part = (input.pot as f64 * fraction).round() as u64;
    // Strong hands with a short stack relative to the pot just go all in.
    let shove = magnitude >= 0.9 && input.stack <= input.pot;
    let pick = |range: &RangeInclusive<u64>, target: u64| {
        if shove {
            *range.end()
        } else {
            target.clamp(*range.start(), *range.end())
        }
    };
    match (&input.legal.bet, &input.legal.raise) {
        (Some(range), _) => Action::Bet(pick(range, pot_part)),
        (None, Some(range)) => Action::Raise(pick(range, input.current_bet + pot_part)),
        (None, None) => passive_action(&input.legal),
    }
}

fn random_legal<R: Rng + ?Sized>(legal: &LegalActions, rng: &mut R) -> Action {
    let mut options = Vec::with_capacity(5);
    if legal.fold {
        options.push(Action::Fold);
    }
    if legal.check {
        options.push(Action::Check);
    }
    if legal.call.is_some() {
        options.push(Action::Call);
    }
    if let Some(r) = &legal.bet {
        options.push(Action::Bet(rng.random_range(r.clone())));
    }
    if let Some(r) = &legal.raise {
        options.push(Action::Raise(rng.random_range(r.clone())));
    }
    options.choose(rng).copied().unwrap_or(Action::Fold)
}

/// Last line of defence: replace anything the table would reject.
fn finish(action: Action, score: f64, reason: DecisionReason, legal: &LegalActions) -> BotDecision {
    let action = if legal.permits(action) { action } else { passive_action(legal) };
    BotDecision { action, score, reason }
}

/// Made-hand strength once a flop is out; a starting-hand heuristic before.
pub fn hand_strength(hole: &HoleCards, board: &Board) -> Result<f64, EvalError> {
    if board.len() < 3 {
        return Ok(preflop_strength(hole));
    }
    Ok(evaluate_holdem(hole, board)?.strength())
}

fn preflop_strength(hole: &HoleCards) -> f64 {
    let a = f64::from(hole.first().rank().value());
    let b = f64::from(hole.second().rank().value());
    let (high, low) = if a >= b { (a, b) } else { (b, a) };
    let mut score = (high / 14.0) * 0.5 + (low / 14.0) * 0.1;
    if hole.is_pair() {
        score += 0.3 + (high / 14.0) * 0.1;
    }
    if hole.is_suited() {
        score += 0.05;
    }
    match (high - low) as u8 {
        1 => score += 0.05,
        2 => score += 0.02,
        g if g > 4 => score -= 0.05,
        _ => {}
    }
    score.clamp(0.0, 1.0)
}

/// Equity trials a bot spends per decision.
fn trials_for(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 150,
        Difficulty::Medium => 400,
        Difficulty::Hard => 1000,
    }
}

/// Seat controller that estimates equity and then calls [`decide`].
#[derive(Debug, Clone)]
pub struct BotAgent {
    profile: BotProfile,
    tuning: BotTuning,
    calculator: EquityCalculator,
}

impl BotAgent {
    pub fn new(profile: BotProfile) -> Self {
        Self::with_tuning(profile, BotTuning::default())
    }

    pub fn with_tuning(profile: BotProfile, tuning: BotTuning) -> Self {
        let calculator = EquityCalculator::new(trials_for(profile.difficulty));
        Self { profile, tuning, calculator }
    }

    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }
}

impl PlayerAgent for BotAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }

    fn on_turn(
        &mut self,
        engine: &mut dyn GameEngine,
        seat: usize,
        rng: &mut dyn RngCore,
    ) -> Result<bool, AgentError> {
        if engine.to_act() != Some(seat) {
            return Ok(false);
        }
        let Some(hole) = engine.hole_cards(seat) else {
            return Ok(false);
        };
        let board = engine.board().clone();
        let strength = hand_strength(&hole, &board)?;
        let equity = self.calculator.estimate(&hole, &board, engine.live_opponents(seat), &mut *rng)?;
        let pot = engine.pot();
        let input = DecisionInput {
            strength,
            win_probability: equity.win,
            pot: pot.total,
            current_bet: pot.current_bet,
            to_call: engine.to_call(seat),
            stack: engine.stack(seat),
            legal: engine.legal_actions(),
        };
        let decision = decide(&input, &self.profile, &self.tuning, &mut *rng);
        match engine.apply(decision.action) {
            Ok(()) => Ok(true),
            Err(err @ ActionError::Showdown(_)) => Err(err.into()),
            Err(err) => {
                tracing::warn!(seat, action = %decision.action, %err, "bot action rejected, falling back");
                engine.apply(passive_action(&input.legal))?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn facing_bet(strength: f64, win: f64) -> DecisionInput {
        DecisionInput {
            strength,
            win_probability: win,
            pot: 60,
            current_bet: 20,
            to_call: 20,
            stack: 480,
            legal: LegalActions {
                fold: true,
                call: Some(20),
                raise: Some(40..=500),
                to_call: 20,
                ..LegalActions::default()
            },
        }
    }

    fn calm() -> BotTuning {
        BotTuning {
            mistake_easy: 0.0,
            mistake_medium: 0.0,
            mistake_hard: 0.0,
            bluff_tight: 0.0,
            bluff_loose: 0.0,
            bluff_unpredictable: 0.0,
            ..BotTuning::default()
        }
    }

    #[test]
    fn free_check_is_never_folded_without_mistakes() {
        let input = DecisionInput {
            strength: 0.0,
            win_probability: 0.0,
            pot: 40,
            current_bet: 0,
            to_call: 0,
            stack: 200,
            legal: LegalActions {
                fold: true,
                check: true,
                bet: Some(10..=200),
                ..LegalActions::default()
            },
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..200 {
            let d = decide(&input, &BotProfile::default(), &calm(), &mut rng);
            assert_eq!(d.action, Action::Check);
        }
    }

    #[test]
    fn strong_hand_raises_within_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let profile = BotProfile::new(Personality::Tight, Style::Aggressive, Difficulty::Hard);
        let d = decide(&facing_bet(0.95, 0.9), &profile, &calm(), &mut rng);
        assert_eq!(d.reason, DecisionReason::Value);
        match d.action {
            Action::Raise(to) => assert!((40..=500).contains(&to)),
            other => panic!("expected raise, got {other:?}"),
        }
    }

    #[test]
    fn easy_bots_err_more_than_hard() {
        let input = facing_bet(0.95, 0.9);
        let tuning = BotTuning::default();
        let count_folds = |difficulty| {
            let mut rng = ChaCha8Rng::seed_from_u64(77);
            let profile = BotProfile::new(Personality::Tight, Style::Balanced, difficulty);
            (0..2000)
                .filter(|_| decide(&input, &profile, &tuning, &mut rng).action == Action::Fold)
                .count()
        };
        let easy = count_folds(Difficulty::Easy);
        let hard = count_folds(Difficulty::Hard);
        assert!(easy > hard, "easy {easy} vs hard {hard}");
        assert!(easy > 0);
    }

    #[test]
    fn conservative_style_narrows_noise() {
        let tuning = BotTuning::default();
        let wild = BotProfile::new(Personality::Unpredictable, Style::Aggressive, Difficulty::Medium);
        let careful = BotProfile::new(Personality::Unpredictable, Style::Conservative, Difficulty::Medium);
        assert_eq!(tuning.noise(&wild), 0.20);
        assert!((tuning.noise(&careful) - 0.10).abs() < 1e-12);
        let tight = BotProfile::new(Personality::Tight, Style::Conservative, Difficulty::Medium);
        assert!(tuning.noise(&tight) <= 0.01 + 1e-12);
    }

    #[test]
    fn sanitizes_unreachable_sizes() {
        let legal = LegalActions { fold: true, call: Some(30), to_call: 30, ..LegalActions::default() };
        let d = finish(Action::Raise(1_000), 0.0, DecisionReason::Value, &legal);
        assert_eq!(d.action, Action::Call);
    }

    #[test]
    fn random_profiles_respect_difficulty() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            let easy = BotProfile::random_for(Difficulty::Easy, &mut rng);
            assert_ne!(easy.style, Style::Aggressive);
            assert_ne!(easy.personality, Personality::Unpredictable);
            let hard = BotProfile::random_for(Difficulty::Hard, &mut rng);
            assert_ne!(hard.style, Style::Conservative);
            assert_ne!(hard.personality, Personality::Loose);
        }
    }

    #[test]
    fn preflop_pairs_outrank_rags() {
        let aces: HoleCards = "As Ah".parse().unwrap();
        let rags: HoleCards = "7c 2d".parse().unwrap();
        let empty = Board::empty();
        assert!(hand_strength(&aces, &empty).unwrap() > hand_strength(&rags, &empty).unwrap());
    }
}
