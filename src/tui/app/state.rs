use crate::config::TableConfig;
use crate::equity::Equity;
use crate::error::Error;
use crate::game::Action;
use crate::persistence::SessionSnapshot;
use crate::session::Session;
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub const DEFAULT_SAVE_PATH: &str = "holdem-rs-save.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    ToggleHistory,
    ToggleStats,
    ToggleOdds,
    HistoryUp,
    HistoryDown,
    NewHand,
    Fold,
    CheckCall,
    BetMin,
    RaiseMin,
    AmountOpen,
    AmountDigit(u8),
    AmountBackspace,
    AmountIncBb,
    AmountDecBb,
    AmountSubmit,
    AmountCancel,
    Save,
    Load,
}

/// Cached odds, valid while the hand, board and field size are unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OddsCache {
    key: (u32, usize, usize),
    equity: Equity,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    session: Session,
    config: TableConfig,
    save_path: PathBuf,
    pub menu_index: usize,
    pub(crate) menu_cfg: TableConfig,
    show_odds: bool,
    odds: Option<OddsCache>,
    help_open: bool,
    history_open: bool,
    stats_open: bool,
    history_offset: usize,
    amount_entry: Option<String>,
    amount_entry_error: Option<String>,
    message: Option<String>,
    message_at: Option<Instant>,
}

impl AppState {
    pub const HISTORY_PAGE_SIZE: usize = 20;
    const MESSAGE_TTL: Duration = Duration::from_secs(3);

    pub fn new(config: TableConfig) -> Result<Self, Error> {
        let session = Session::new(config.clone())?;
        Ok(Self {
            scene: Scene::Menu,
            session,
            menu_cfg: config.clone(),
            config,
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            menu_index: 0,
            show_odds: false,
            odds: None,
            help_open: false,
            history_open: false,
            stats_open: false,
            history_offset: 0,
            amount_entry: None,
            amount_entry_error: None,
            message: None,
            message_at: None,
        })
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = path.into();
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub(crate) fn replace_session(&mut self, config: TableConfig, session: Session) {
        self.config = config;
        self.session = session;
        self.odds = None;
        self.history_offset = 0;
        self.amount_entry = None;
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn stats_open(&self) -> bool {
        self.stats_open
    }

    pub fn history_offset(&self) -> usize {
        self.history_offset
    }

    pub fn show_odds(&self) -> bool {
        self.show_odds
    }

    pub fn odds(&self) -> Option<Equity> {
        self.odds.map(|o| o.equity)
    }

    pub fn amount_entry_active(&self) -> bool {
        self.amount_entry.is_some()
    }

    pub fn amount_entry_text(&self) -> Option<&str> {
        self.amount_entry.as_deref()
    }

    pub fn amount_entry_error(&self) -> Option<&str> {
        self.amount_entry_error.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(crate) fn close_overlays(&mut self) {
        self.help_open = false;
        self.history_open = false;
        self.stats_open = false;
    }

    pub(crate) fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_at = Some(Instant::now());
    }

    fn clear_message(&mut self) {
        self.message = None;
        self.message_at = None;
    }

    /// Whether the human may act right now.
    pub fn can_act(&self) -> bool {
        self.scene == Scene::Table && self.session.awaiting_human()
    }

    fn submit(&mut self, action: Action) -> bool {
        if !self.can_act() {
            return false;
        }
        match self.session.submit_human(action) {
            Ok(()) => {
                self.clear_message();
                true
            }
            Err(err) => {
                self.set_message(err.to_string());
                false
            }
        }
    }

    fn check_or_call(&mut self) -> bool {
        let legal = self.session.game().legal_actions();
        let action = if legal.check { Action::Check } else { Action::Call };
        self.submit(action)
    }

    fn min_aggression(&mut self, raise: bool) -> bool {
        let legal = self.session.game().legal_actions();
        let action = match (raise, legal.bet, legal.raise) {
            (false, Some(r), _) => Action::Bet(*r.start()),
            (true, _, Some(r)) => Action::Raise(*r.start()),
            _ => {
                self.set_message(if raise { "Raise not allowed" } else { "Bet not allowed" });
                return false;
            }
        };
        self.submit(action)
    }

    fn open_amount_entry(&mut self) -> bool {
        if !self.can_act() {
            return false;
        }
        let legal = self.session.game().legal_actions();
        let Some(range) = legal.bet.or(legal.raise) else {
            self.set_message("No bet or raise available");
            return false;
        };
        self.amount_entry = Some(range.start().to_string());
        self.amount_entry_error = None;
        true
    }

    fn amount_entry_backspace(&mut self) {
        if let Some(buf) = self.amount_entry.as_mut() {
            buf.pop();
        }
        self.amount_entry_error = None;
    }

    fn amount_entry_push_digit(&mut self, digit: u8) {
        if let Some(buf) = self.amount_entry.as_mut() {
            if buf.len() < 12 {
                buf.push(char::from(b'0' + digit));
            }
        }
        self.amount_entry_error = None;
    }

    fn amount_entry_adjust_bb(&mut self, delta: i64) {
        let step = self.session.game().big_blind().max(1);
        if let Some(buf) = self.amount_entry.as_mut() {
            let cur = buf.parse::<u64>().unwrap_or(0);
            let next = if delta >= 0 { cur.saturating_add(step) } else { cur.saturating_sub(step) };
            *buf = next.to_string();
        }
        self.amount_entry_error = None;
    }

    fn amount_entry_submit(&mut self) -> bool {
        let Some(buf) = self.amount_entry.as_ref() else {
            return false;
        };
        let Ok(amount) = buf.parse::<u64>() else {
            self.amount_entry_error = Some("Invalid amount".into());
            return false;
        };
        let legal = self.session.game().legal_actions();
        let action = if legal.bet.is_some() { Action::Bet(amount) } else { Action::Raise(amount) };
        if let Err(err) = legal.validate(action) {
            self.amount_entry_error = Some(err.to_string());
            return false;
        }
        if self.submit(action) {
            self.amount_entry = None;
            self.amount_entry_error = None;
            return true;
        }
        self.amount_entry_error = Some("Action not allowed".into());
        false
    }

    fn amount_entry_cancel(&mut self) {
        self.amount_entry = None;
        self.amount_entry_error = None;
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        let table = self.scene == Scene::Table;
        let menu = self.scene == Scene::Menu;
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if table {
                    let open = !self.help_open;
                    self.close_overlays();
                    self.help_open = open;
                }
                false
            }
            InputAction::ToggleHistory => {
                if table {
                    let open = !self.history_open;
                    self.close_overlays();
                    self.history_open = open;
                    self.history_offset = 0;
                }
                false
            }
            InputAction::ToggleStats => {
                if table {
                    let open = !self.stats_open;
                    self.close_overlays();
                    self.stats_open = open;
                }
                false
            }
            InputAction::ToggleOdds => {
                if table {
                    self.show_odds = !self.show_odds;
                    self.refresh_odds();
                }
                false
            }
            InputAction::HistoryUp => {
                if table && self.history_open {
                    let len = self.session.game().history().len();
                    let max_offset = len.saturating_sub(Self::HISTORY_PAGE_SIZE);
                    self.history_offset = (self.history_offset + 1).min(max_offset);
                }
                false
            }
            InputAction::HistoryDown => {
                if table && self.history_open {
                    self.history_offset = self.history_offset.saturating_sub(1);
                }
                false
            }
            InputAction::MenuNext => {
                if menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => menu && self.apply_menu(),
            InputAction::MenuCancel => {
                if menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::NewHand => table && self.new_hand(),
            InputAction::Fold => self.submit(Action::Fold),
            InputAction::CheckCall => self.check_or_call(),
            InputAction::BetMin => self.min_aggression(false),
            InputAction::RaiseMin => self.min_aggression(true),
            InputAction::AmountOpen => self.open_amount_entry(),
            InputAction::AmountDigit(d) => {
                self.amount_entry_push_digit(d);
                false
            }
            InputAction::AmountBackspace => {
                self.amount_entry_backspace();
                false
            }
            InputAction::AmountIncBb => {
                self.amount_entry_adjust_bb(1);
                false
            }
            InputAction::AmountDecBb => {
                self.amount_entry_adjust_bb(-1);
                false
            }
            InputAction::AmountSubmit => self.amount_entry_submit(),
            InputAction::AmountCancel => {
                self.amount_entry_cancel();
                false
            }
            InputAction::Save => table && self.save(),
            InputAction::Load => table && self.load(),
        }
    }

    pub fn new_hand(&mut self) -> bool {
        if self.session.game().in_progress() {
            return false;
        }
        if self.session.is_over() {
            self.set_message("Game over. Press M for a new table.");
            return false;
        }
        match self.session.start_hand() {
            Ok(()) => {
                self.history_offset = 0;
                self.clear_message();
                self.refresh_odds();
                true
            }
            Err(err) => {
                self.set_message(err.to_string());
                false
            }
        }
    }

    fn save(&mut self) -> bool {
        let result = self.session.snapshot().and_then(|s| Ok(s.save_to(&self.save_path)?));
        match result {
            Ok(()) => {
                self.set_message(format!("Saved to {}", self.save_path.display()));
                true
            }
            Err(err) => {
                self.set_message(err.to_string());
                false
            }
        }
    }

    fn load(&mut self) -> bool {
        if self.session.game().in_progress() {
            self.set_message("Finish the hand before loading");
            return false;
        }
        let result = SessionSnapshot::load_from(&self.save_path)
            .map_err(Error::from)
            .and_then(|snap| Session::from_snapshot(&snap, self.config.clone()));
        match result {
            Ok(session) => {
                let config = self.config.clone();
                self.replace_session(config, session);
                self.set_message(format!("Loaded {}", self.save_path.display()));
                true
            }
            Err(err) => {
                self.set_message(err.to_string());
                false
            }
        }
    }

    /// Recompute the human's odds if they are shown and the spot changed.
    pub fn refresh_odds(&mut self) {
        if !self.show_odds {
            return;
        }
        let game = self.session.game();
        let Some(seat) = self.session.human_seat() else {
            return;
        };
        let key = (game.hand_number(), game.board().len(), game.live_opponents(seat));
        if self.odds.is_some_and(|o| o.key == key) || !game.street().is_betting() {
            return;
        }
        match self.session.human_equity() {
            Ok(Some(equity)) => self.odds = Some(OddsCache { key, equity }),
            Ok(None) => self.odds = None,
            Err(err) => self.set_message(err.to_string()),
        }
    }

    /// Advance bots and expire stale messages. Called once per controller tick.
    pub fn tick(&mut self) {
        if self.message_at.is_some_and(|at| at.elapsed() >= Self::MESSAGE_TTL) {
            self.clear_message();
        }
        if self.scene != Scene::Table || !self.session.game().in_progress() {
            return;
        }
        if let Err(err) = self.session.step() {
            self.set_message(err.to_string());
        }
        self.refresh_odds();
    }
}
