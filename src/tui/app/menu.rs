use crate::agents::Difficulty;
use crate::config::MAX_BOTS;
use crate::session::Session;

use super::{AppState, Scene};

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Bots,
    StartingStack,
    SmallBlind,
    BigBlind,
    BotDifficulty,
    BotDelayMs,
    EquityTrials,
}

const MENU_ITEMS: [MenuItem; 7] = [
    MenuItem::Bots,
    MenuItem::StartingStack,
    MenuItem::SmallBlind,
    MenuItem::BigBlind,
    MenuItem::BotDifficulty,
    MenuItem::BotDelayMs,
    MenuItem::EquityTrials,
];

fn next_difficulty(d: Difficulty) -> Difficulty {
    match d {
        Difficulty::Easy => Difficulty::Medium,
        Difficulty::Medium => Difficulty::Hard,
        Difficulty::Hard => Difficulty::Easy,
    }
}

fn prev_difficulty(d: Difficulty) -> Difficulty {
    match d {
        Difficulty::Easy => Difficulty::Hard,
        Difficulty::Medium => Difficulty::Easy,
        Difficulty::Hard => Difficulty::Medium,
    }
}

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        let cfg = &app.menu_cfg;
        match self {
            MenuItem::Bots => format!("Bots: {}", cfg.num_bots),
            MenuItem::StartingStack => format!("Starting Stack: ${}", cfg.starting_stack),
            MenuItem::SmallBlind => format!("Small Blind: {}", cfg.small_blind),
            MenuItem::BigBlind => format!("Big Blind: {}", cfg.big_blind),
            MenuItem::BotDifficulty => format!("Bot Difficulty: {:?}", cfg.difficulty),
            MenuItem::BotDelayMs => format!("Bot Delay (ms): {}", cfg.bot_delay_ms),
            MenuItem::EquityTrials => format!("Odds Trials: {}", cfg.equity_trials),
        }
    }

    fn inc(self, app: &mut AppState) {
        let cfg = &mut app.menu_cfg;
        match self {
            MenuItem::Bots => cfg.num_bots = (cfg.num_bots + 1).min(MAX_BOTS),
            MenuItem::StartingStack => cfg.starting_stack = cfg.starting_stack.saturating_add(100),
            MenuItem::SmallBlind => {
                cfg.small_blind = cfg.small_blind.saturating_add(1);
                cfg.big_blind = cfg.big_blind.max(cfg.small_blind);
            }
            MenuItem::BigBlind => cfg.big_blind = cfg.big_blind.saturating_add(1),
            MenuItem::BotDifficulty => cfg.difficulty = next_difficulty(cfg.difficulty),
            MenuItem::BotDelayMs => cfg.bot_delay_ms = cfg.bot_delay_ms.saturating_add(100),
            MenuItem::EquityTrials => cfg.equity_trials = cfg.equity_trials.saturating_add(250),
        }
    }

    fn dec(self, app: &mut AppState) {
        let cfg = &mut app.menu_cfg;
        match self {
            MenuItem::Bots => cfg.num_bots = cfg.num_bots.saturating_sub(1).max(1),
            MenuItem::StartingStack => {
                cfg.starting_stack = cfg.starting_stack.saturating_sub(100).max(100)
            }
            MenuItem::SmallBlind => cfg.small_blind = cfg.small_blind.saturating_sub(1).max(1),
            MenuItem::BigBlind => {
                cfg.big_blind = cfg.big_blind.saturating_sub(1).max(1);
                cfg.small_blind = cfg.small_blind.min(cfg.big_blind);
            }
            MenuItem::BotDifficulty => cfg.difficulty = prev_difficulty(cfg.difficulty),
            MenuItem::BotDelayMs => cfg.bot_delay_ms = cfg.bot_delay_ms.saturating_sub(100),
            MenuItem::EquityTrials => {
                cfg.equity_trials = cfg.equity_trials.saturating_sub(250).max(250)
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        match self.scene {
            Scene::Menu => self.cancel_menu(),
            _ => self.open_menu(),
        }
    }

    pub fn open_menu(&mut self) {
        self.close_overlays();
        self.menu_index = 0;
        self.menu_cfg = self.config().clone();
        self.scene = Scene::Menu;
    }

    /// Start a fresh table from the edited settings. Keeps the menu open on error.
    pub fn apply_menu(&mut self) -> bool {
        let mut cfg = self.menu_cfg.clone();
        cfg.bots.truncate(cfg.num_bots);
        match Session::new(cfg.clone()) {
            Ok(session) => {
                self.replace_session(cfg, session);
                self.scene = Scene::Table;
                true
            }
            Err(err) => {
                self.set_message(err.to_string());
                false
            }
        }
    }

    pub fn cancel_menu(&mut self) {
        self.scene = Scene::Table;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }

    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }

    pub fn menu_inc(&mut self) {
        MENU_ITEMS[self.menu_index % MENU_ITEMS.len()].inc(self);
    }

    pub fn menu_dec(&mut self) {
        MENU_ITEMS[self.menu_index % MENU_ITEMS.len()].dec(self);
    }
}
