//! One human against bots at a single table, hand after hand.
//!
//! The session owns the only random source. Shuffles, bot noise and equity
//! sampling all draw from it, so a seeded session replays exactly.

use crate::agents::{AgentTable, BotAgent, BotProfile, HumanAgent};
use crate::config::TableConfig;
use crate::equity::{Equity, EquityCalculator};
use crate::error::{Error, Result};
use crate::game::{Action, ActionError, Game, Player};
use crate::persistence::{PlayerSnapshot, SaveError, SeatKind, SessionSnapshot, FORMAT_VERSION};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

#[derive(Debug)]
pub struct Session {
    game: Game,
    agents: AgentTable,
    rng: ChaCha8Rng,
    config: TableConfig,
    seats: Vec<SeatKind>,
    blind_level: usize,
    equity: EquityCalculator,
}

impl Session {
    /// Human in seat 0, then `config.num_bots` bots.
    pub fn new(config: TableConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded(config.seed);
        let mut seats = vec![SeatKind::Human];
        seats.extend(config.bot_profiles(&mut rng).into_iter().map(SeatKind::Bot));
        let players = seat_names(&config, &seats)
            .into_iter()
            .map(|name| Player::new(name, config.starting_stack))
            .collect();
        Ok(Self::assemble(config, seats, players, rng))
    }

    /// Every seat a bot; useful for simulations. Seat 0 gets a profile drawn for the
    /// configured difficulty like the others.
    pub fn bots_only(config: TableConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded(config.seed);
        let mut seats = vec![SeatKind::Bot(BotProfile::random_for(config.difficulty, &mut rng))];
        seats.extend(config.bot_profiles(&mut rng).into_iter().map(SeatKind::Bot));
        let players = (0..seats.len())
            .map(|i| Player::new(format!("Bot {}", i + 1), config.starting_stack))
            .collect();
        Ok(Self::assemble(config, seats, players, rng))
    }

    /// Resume from a save. Profiles and stats come from the snapshot, table rules
    /// (schedule, tuning, trials) from `config`.
    pub fn from_snapshot(snapshot: &SessionSnapshot, config: TableConfig) -> Result<Self> {
        snapshot.validate()?;
        let rng = seeded(config.seed);
        let seats: Vec<SeatKind> = snapshot.players.iter().map(|p| p.seat).collect();
        let players = snapshot.players.iter().map(|p| Player::new(p.name.clone(), p.stack)).collect();
        let mut session = Self::assemble(config, seats, players, rng);
        for (player, saved) in session.game.players_mut().iter_mut().zip(&snapshot.players) {
            player.stats = saved.stats.clone();
        }
        session.game.restore_position(snapshot.dealer, snapshot.hand_number);
        session.game.set_blinds(snapshot.small_blind, snapshot.big_blind);
        session.blind_level = snapshot.blind_level;
        tracing::info!(hand = snapshot.hand_number, players = snapshot.players.len(), "session resumed");
        Ok(session)
    }

    fn assemble(config: TableConfig, seats: Vec<SeatKind>, players: Vec<Player>, rng: ChaCha8Rng) -> Self {
        let mut agents = AgentTable::for_seats(seats.len());
        for (seat, kind) in seats.iter().enumerate() {
            match kind {
                SeatKind::Human => agents.set_agent(seat, Some(Box::new(HumanAgent::new()))),
                SeatKind::Bot(profile) => agents.set_agent(
                    seat,
                    Some(Box::new(BotAgent::with_tuning(*profile, config.bot_tuning))),
                ),
            }
        }
        agents.set_min_action_delay_ms(config.bot_delay_ms);
        let (blind_level, blinds) = config.blinds_for(0);
        let game = Game::with_players(players, blinds.small, blinds.big);
        let equity = EquityCalculator::new(config.equity_trials);
        Self { game, agents, rng, config, seats, blind_level, equity }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn seats(&self) -> &[SeatKind] {
        &self.seats
    }

    pub fn human_seat(&self) -> Option<usize> {
        self.seats.iter().position(|s| *s == SeatKind::Human)
    }

    pub fn blind_level(&self) -> usize {
        self.blind_level
    }

    /// Deal the next hand at the scheduled blind level.
    pub fn start_hand(&mut self) -> Result<()> {
        let (level, blinds) = self.config.blinds_for(self.game.hand_number());
        if self.config.blind_schedule.is_some() && level > self.blind_level {
            tracing::info!(level, small = blinds.small, big = blinds.big, "blinds up");
            self.blind_level = level;
            self.game.set_blinds(blinds.small, blinds.big);
        }
        self.game.start_hand(&mut self.rng)?;
        Ok(())
    }

    /// Let the seat to act move if it can without input. Returns whether anything happened.
    pub fn step(&mut self) -> Result<bool> {
        Ok(self.agents.on_turn(&mut self.game, &mut self.rng)?)
    }

    /// Apply the human's action now. Illegal actions leave the hand untouched.
    pub fn submit_human(&mut self, action: Action) -> Result<()> {
        let seat = match self.human_seat() {
            Some(seat) if self.game.to_act() == Some(seat) => seat,
            _ => return Err(ActionError::PlayerNotActive.into()),
        };
        self.agents.receive(seat, action);
        self.agents.on_turn(&mut self.game, &mut self.rng)?;
        Ok(())
    }

    /// Whether the hand is waiting on the human.
    pub fn awaiting_human(&self) -> bool {
        self.human_seat().is_some() && self.game.to_act() == self.human_seat()
    }

    /// Deal and finish one hand. Every seat that acts must be a bot.
    pub fn play_hand(&mut self) -> Result<()> {
        self.start_hand()?;
        while self.game.in_progress() {
            if self.step()? {
                continue;
            }
            if self.agents.is_throttled() {
                std::thread::sleep(Duration::from_millis(5));
                continue;
            }
            return Err(Error::AwaitingInput(self.game.to_act().unwrap_or_default()));
        }
        Ok(())
    }

    /// Odds for the human's current hand, or `None` when they hold no live cards.
    pub fn human_equity(&mut self) -> Result<Option<Equity>> {
        let Some(seat) = self.human_seat() else {
            return Ok(None);
        };
        let Some(player) = self.game.player(seat) else {
            return Ok(None);
        };
        let Some(hole) = player.hole().filter(|_| player.is_live()) else {
            return Ok(None);
        };
        let opponents = self.game.live_opponents(seat);
        let eq = self.equity.estimate(&hole, self.game.board(), opponents, &mut self.rng)?;
        Ok(Some(eq))
    }

    /// Over once fewer than two players have chips or the human is out of chips.
    pub fn is_over(&self) -> bool {
        if self.game.in_progress() {
            return false;
        }
        let funded = self.game.players().iter().filter(|p| p.stack() > 0).count();
        let human_busted = self
            .human_seat()
            .and_then(|s| self.game.player(s))
            .is_some_and(|p| p.stack() == 0);
        funded < 2 || human_busted
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        if self.game.in_progress() {
            return Err(SaveError::HandInProgress.into());
        }
        let players = self
            .game
            .players()
            .iter()
            .zip(&self.seats)
            .map(|(p, seat)| PlayerSnapshot {
                name: p.name().to_string(),
                stack: p.stack(),
                seat: *seat,
                stats: p.stats().clone(),
            })
            .collect();
        let snapshot = SessionSnapshot {
            format_version: FORMAT_VERSION,
            hand_number: self.game.hand_number(),
            dealer: self.game.dealer(),
            blind_level: self.blind_level,
            small_blind: self.game.small_blind(),
            big_blind: self.game.big_blind(),
            players,
        };
        Ok(snapshot)
    }
}

fn seeded(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

fn seat_names(config: &TableConfig, seats: &[SeatKind]) -> Vec<String> {
    let mut bot = 0;
    seats
        .iter()
        .map(|s| match s {
            SeatKind::Human => config.player_name.clone(),
            SeatKind::Bot(_) => {
                bot += 1;
                format!("Bot {bot}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{HandStartError, Street};

    fn quick(seed: u64) -> TableConfig {
        TableConfig { seed: Some(seed), bot_delay_ms: 0, equity_trials: 50, ..TableConfig::default() }
    }

    #[test]
    fn human_sits_in_seat_zero() {
        let s = Session::new(quick(1)).unwrap();
        assert_eq!(s.human_seat(), Some(0));
        assert_eq!(s.game().players().len(), 4);
        assert_eq!(s.game().players()[0].name(), "You");
        assert_eq!(s.game().players()[3].name(), "Bot 3");
    }

    #[test]
    fn human_turn_blocks_until_submitted() {
        let mut s = Session::new(quick(3)).unwrap();
        s.start_hand().unwrap();
        while !s.awaiting_human() && s.game().in_progress() {
            assert!(s.step().unwrap());
        }
        if s.awaiting_human() {
            assert!(!s.step().unwrap());
            let eq = s.human_equity().unwrap().unwrap();
            assert!((eq.win + eq.tie + eq.loss - 1.0).abs() < 1e-9);
            s.submit_human(Action::Fold).unwrap();
            assert!(!s.awaiting_human());
        }
    }

    #[test]
    fn play_hand_deals_its_own_hand() {
        let mut s = Session::bots_only(quick(7)).unwrap();
        s.start_hand().unwrap();
        if s.game().in_progress() {
            assert_eq!(s.play_hand().unwrap_err(), Error::HandStart(HandStartError::HandInProgress));
        }
        while s.game().in_progress() {
            assert!(s.step().unwrap());
        }
        s.play_hand().unwrap();
        assert_eq!(s.game().hand_number(), 2);
        assert!(!s.game().in_progress());
    }

    #[test]
    fn snapshot_refused_mid_hand() {
        let mut s = Session::new(quick(4)).unwrap();
        s.start_hand().unwrap();
        if s.game().in_progress() {
            assert_eq!(s.snapshot().unwrap_err(), Error::Save(SaveError::HandInProgress));
        }
    }

    #[test]
    fn blind_schedule_raises_blinds() {
        let mut cfg = quick(5);
        cfg.blind_schedule = Some(crate::config::BlindSchedule {
            every_hands: 1,
            levels: vec![
                crate::config::BlindLevel { small: 5, big: 10 },
                crate::config::BlindLevel { small: 10, big: 20 },
            ],
        });
        let mut s = Session::bots_only(cfg).unwrap();
        s.play_hand().unwrap();
        assert_eq!(s.game().big_blind(), 10);
        s.play_hand().unwrap();
        assert_eq!((s.blind_level(), s.game().big_blind()), (1, 20));
        assert_eq!(s.game().street(), Street::HandComplete);
    }
}
