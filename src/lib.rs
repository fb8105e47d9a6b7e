//! holdem-rs: a single-table Texas Hold'em engine.
//!
//! - 5 to 7 card hand evaluation with a total order over hands
//! - Monte Carlo equity estimation with an injectable RNG
//! - A betting state machine with side pots and split pots
//! - Rule-based bots and a `ratatui` front end
//!
//! ## Quick start: evaluate a Hold'em hand
//! ```
//! use holdem_rs::cards::{Card, Rank, Suit};
//! use holdem_rs::evaluator::{evaluate_holdem, Category};
//! use holdem_rs::hand::{Board, HoleCards};
//!
//! let hole = HoleCards::try_new(
//!     Card::new(Rank::Ace, Suit::Spades),
//!     Card::new(Rank::Ace, Suit::Hearts),
//! ).unwrap();
//! let board: Board = "Kc Qd Jh 3s 2c".parse().unwrap();
//!
//! let eval = evaluate_holdem(&hole, &board).unwrap();
//! assert_eq!(eval.category, Category::Pair);
//! ```
//!
//! ## Quick start: play a hand between bots
//! ```
//! use holdem_rs::config::TableConfig;
//! use holdem_rs::session::Session;
//!
//! let config = TableConfig { seed: Some(7), bot_delay_ms: 0, equity_trials: 50, ..Default::default() };
//! let mut session = Session::bots_only(config).unwrap();
//! session.play_hand().unwrap();
//! assert!(!session.game().in_progress());
//! ```
//!
//! ## TUI
//! ```sh
//! cargo run --bin holdem-rs
//! ```

pub mod agents;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod equity;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod hand;
pub mod logging;
pub mod persistence;
pub mod pot;
pub mod session;
pub mod stats;
pub mod tui;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
