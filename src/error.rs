use crate::agents::AgentError;
use crate::cards::CardParseError;
use crate::config::ConfigError;
use crate::deck::DeckError;
use crate::equity::EquityError;
use crate::evaluator::EvalError;
use crate::game::{ActionError, HandStartError};
use crate::hand::HandError;
use crate::persistence::SaveError;

/// Any failure the library can report.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Card(#[from] CardParseError),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Evaluation(#[from] EvalError),
    #[error(transparent)]
    Equity(#[from] EquityError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    HandStart(#[from] HandStartError),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error("seat {0} is waiting for input")]
    AwaitingInput(usize),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
