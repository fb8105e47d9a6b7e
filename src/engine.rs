// Engine boundary. Agents and front-ends read the table and submit actions
// through this trait instead of reaching into `Game` directly.

use crate::game::{Action, ActionError, Game, LegalActions, Street};
use crate::hand::{Board, HoleCards};
use crate::pot::PotState;

pub trait GameEngine {
    fn apply(&mut self, action: Action) -> Result<(), ActionError>;
    fn legal_actions(&self) -> LegalActions;

    // Queries
    fn to_act(&self) -> Option<usize>;
    fn to_call(&self, seat: usize) -> u64;
    fn pot(&self) -> PotState;
    fn hole_cards(&self, seat: usize) -> Option<HoleCards>;
    fn board(&self) -> &Board;
    fn stack(&self, seat: usize) -> u64;
    fn street(&self) -> Street;
    fn live_opponents(&self, seat: usize) -> usize;
}

impl GameEngine for Game {
    fn apply(&mut self, action: Action) -> Result<(), ActionError> {
        Game::apply(self, action)
    }
    fn legal_actions(&self) -> LegalActions {
        Game::legal_actions(self)
    }

    fn to_act(&self) -> Option<usize> {
        Game::to_act(self)
    }
    fn to_call(&self, seat: usize) -> u64 {
        Game::to_call(self, seat)
    }
    fn pot(&self) -> PotState {
        self.pot
    }
    fn hole_cards(&self, seat: usize) -> Option<HoleCards> {
        self.players.get(seat).and_then(|p| p.hole)
    }
    fn board(&self) -> &Board {
        &self.board
    }
    fn stack(&self, seat: usize) -> u64 {
        self.players.get(seat).map_or(0, |p| p.stack)
    }
    fn street(&self) -> Street {
        self.street
    }
    fn live_opponents(&self, seat: usize) -> usize {
        Game::live_opponents(self, seat)
    }
}
