//! Seat controllers.
//!
//! `PlayerAgent` is the one trait every seat driver implements; `AgentTable`
//! maps seats to agents and drives whichever one is due to act. Humans get a
//! queue-one-action agent fed by the front-end; bots live in [`bots`].

use crate::engine::GameEngine;
use crate::equity::EquityError;
use crate::evaluator::EvalError;
use crate::game::{Action, ActionError};
use core::fmt;
use rand::RngCore;
use std::time::{Duration, Instant};

pub mod bots;

pub use bots::{
    decide, hand_strength, BotAgent, BotDecision, BotProfile, BotTuning, DecisionInput,
    DecisionReason, Difficulty, Personality, Style,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub enum AgentKind {
    Human,
    Bot,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Evaluation(#[from] EvalError),
    #[error(transparent)]
    Equity(#[from] EquityError),
}

pub trait PlayerAgent {
    /// Called when `seat` may be the one to act. Returns whether an action was applied.
    fn on_turn(
        &mut self,
        engine: &mut dyn GameEngine,
        seat: usize,
        rng: &mut dyn RngCore,
    ) -> Result<bool, AgentError>;

    fn kind(&self) -> AgentKind;

    /// Queue an action chosen elsewhere. Agents that decide for themselves refuse.
    fn receive(&mut self, _action: Action) -> bool {
        false
    }
}

/// Plays whatever the front-end queued, once it is this seat's turn.
#[derive(Debug, Default)]
pub struct HumanAgent {
    pending: Option<Action>,
}

impl HumanAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<Action> {
        self.pending
    }
}

impl PlayerAgent for HumanAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }

    fn receive(&mut self, action: Action) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(action);
        true
    }

    fn on_turn(
        &mut self,
        engine: &mut dyn GameEngine,
        seat: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<bool, AgentError> {
        if !engine.street().is_betting() {
            self.pending = None;
            return Ok(false);
        }
        if engine.to_act() != Some(seat) {
            return Ok(false);
        }
        let Some(action) = self.pending.take() else {
            return Ok(false);
        };
        engine.apply(action)?;
        Ok(true)
    }
}

/// One optional agent per seat, with an optional pause between bot actions.
pub struct AgentTable {
    seats: Vec<Option<Box<dyn PlayerAgent>>>,
    min_action_delay: Duration,
    next_action_at: Option<Instant>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .iter()
            .map(|a| match a.as_deref().map(|a| a.kind()) {
                Some(AgentKind::Human) => 'H',
                Some(AgentKind::Bot) => 'B',
                None => '-',
            })
            .collect();
        write!(f, "AgentTable({flags})")
    }
}

impl AgentTable {
    pub fn for_seats(n: usize) -> Self {
        let mut seats = Vec::with_capacity(n);
        seats.resize_with(n, || None);
        Self { seats, min_action_delay: Duration::ZERO, next_action_at: None }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn set_agent(&mut self, seat: usize, agent: Option<Box<dyn PlayerAgent>>) {
        if seat >= self.seats.len() {
            self.seats.resize_with(seat + 1, || None);
        }
        self.seats[seat] = agent;
    }

    pub fn agent_kind(&self, seat: usize) -> Option<AgentKind> {
        self.seats.get(seat).and_then(|a| a.as_deref().map(|ag| ag.kind()))
    }

    /// Forward a front-end action to the agent at `seat`.
    pub fn receive(&mut self, seat: usize, action: Action) -> bool {
        match self.seats.get_mut(seat) {
            Some(Some(agent)) => agent.receive(action),
            _ => false,
        }
    }

    pub fn human_seat(&self) -> Option<usize> {
        (0..self.seats.len()).find(|&s| self.agent_kind(s) == Some(AgentKind::Human))
    }

    pub fn set_min_action_delay_ms(&mut self, delay_ms: u64) {
        self.min_action_delay = Duration::from_millis(delay_ms);
    }

    /// Whether a bot is still waiting out the action delay.
    pub fn is_throttled(&self) -> bool {
        self.next_action_at.is_some_and(|at| Instant::now() < at)
    }

    /// Drive the agent for the seat to act, if there is one.
    pub fn on_turn(
        &mut self,
        engine: &mut dyn GameEngine,
        rng: &mut dyn RngCore,
    ) -> Result<bool, AgentError> {
        let Some(seat) = engine.to_act() else {
            return Ok(false);
        };
        let throttled = self.is_throttled();
        let Some(Some(agent)) = self.seats.get_mut(seat) else {
            return Ok(false);
        };
        let is_bot = agent.kind() == AgentKind::Bot;
        if is_bot && throttled {
            return Ok(false);
        }
        let acted = agent.on_turn(engine, seat, rng)?;
        if acted && !self.min_action_delay.is_zero() {
            self.next_action_at = Some(Instant::now() + self.min_action_delay);
        }
        Ok(acted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Game, Street};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bots_only(n: usize) -> AgentTable {
        let mut table = AgentTable::for_seats(n);
        for seat in 0..n {
            table.set_agent(seat, Some(Box::new(BotAgent::new(BotProfile::default()))));
        }
        table
    }

    #[test]
    fn bots_finish_a_hand() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut game = Game::new(4, 500, 5, 10);
        let mut table = bots_only(4);
        game.start_hand(&mut rng).unwrap();
        let chips = game.total_chips();
        let mut guard = 0;
        while game.in_progress() {
            assert!(table.on_turn(&mut game, &mut rng).unwrap());
            guard += 1;
            assert!(guard < 200, "hand did not terminate");
        }
        assert_eq!(game.total_chips(), chips);
        assert_eq!(game.street(), Street::HandComplete);
    }

    #[test]
    fn human_waits_for_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut game = Game::new(2, 100, 5, 10);
        let mut table = AgentTable::for_seats(2);
        table.set_agent(0, Some(Box::new(HumanAgent::new())));
        table.set_agent(1, Some(Box::new(HumanAgent::new())));
        game.start_hand(&mut rng).unwrap();
        let seat = game.to_act().unwrap();
        assert!(!table.on_turn(&mut game, &mut rng).unwrap());
        assert!(table.receive(seat, Action::Call));
        assert!(!table.receive(seat, Action::Fold), "only one queued action");
        assert!(table.on_turn(&mut game, &mut rng).unwrap());
        assert_ne!(game.to_act(), Some(seat));
    }

    #[test]
    fn illegal_human_action_is_reported() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut game = Game::new(2, 100, 5, 10);
        let mut table = AgentTable::for_seats(2);
        table.set_agent(0, Some(Box::new(HumanAgent::new())));
        table.set_agent(1, Some(Box::new(HumanAgent::new())));
        game.start_hand(&mut rng).unwrap();
        let seat = game.to_act().unwrap();
        table.receive(seat, Action::Check);
        let err = table.on_turn(&mut game, &mut rng).unwrap_err();
        assert!(matches!(err, AgentError::Action(ActionError::CannotCheck { .. })));
        assert_eq!(game.to_act(), Some(seat));
    }

    #[test]
    fn delay_throttles_bots() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut game = Game::new(3, 1000, 5, 10);
        let mut table = bots_only(3);
        table.set_min_action_delay_ms(60_000);
        game.start_hand(&mut rng).unwrap();
        assert!(table.on_turn(&mut game, &mut rng).unwrap());
        assert!(table.is_throttled());
        assert!(!table.on_turn(&mut game, &mut rng).unwrap());
    }

    #[test]
    fn debug_shows_seat_kinds() {
        let mut table = AgentTable::for_seats(3);
        table.set_agent(0, Some(Box::new(HumanAgent::new())));
        table.set_agent(2, Some(Box::new(BotAgent::new(BotProfile::default()))));
        assert_eq!(format!("{table:?}"), "AgentTable(H-B)");
        assert_eq!(table.human_seat(), Some(0));
    }
}
