use crate::tui::app::{AppState, InputAction, Scene};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Map a key to an input action. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    let send = |app: &mut AppState, action: InputAction| {
        let _ = app.handle_input(action);
    };
    if app.amount_entry_active() {
        match code {
            KeyCode::Esc => send(app, InputAction::AmountCancel),
            KeyCode::Enter => send(app, InputAction::AmountSubmit),
            KeyCode::Backspace => send(app, InputAction::AmountBackspace),
            KeyCode::Char('+') | KeyCode::Char('=') => send(app, InputAction::AmountIncBb),
            KeyCode::Char('-') | KeyCode::Char('_') => send(app, InputAction::AmountDecBb),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                send(app, InputAction::AmountDigit(c as u8 - b'0'))
            }
            _ => {}
        }
        return false;
    }
    if app.scene == Scene::Table {
        match code {
            KeyCode::Char('?') => return toggle(app, InputAction::ToggleHelp),
            KeyCode::Char('h') | KeyCode::Char('H') => return toggle(app, InputAction::ToggleHistory),
            KeyCode::Char('s') | KeyCode::Char('S') => return toggle(app, InputAction::ToggleStats),
            _ => {}
        }
        if app.history_open() {
            match code {
                KeyCode::Up => send(app, InputAction::HistoryUp),
                KeyCode::Down => send(app, InputAction::HistoryDown),
                KeyCode::Esc => send(app, InputAction::ToggleHistory),
                _ => {}
            }
            return false;
        }
        if app.help_open() || app.stats_open() {
            if code == KeyCode::Esc {
                let action =
                    if app.help_open() { InputAction::ToggleHelp } else { InputAction::ToggleStats };
                send(app, action);
            }
            return false;
        }
    }

    match app.scene {
        Scene::Menu => match code {
            KeyCode::Up => send(app, InputAction::MenuPrev),
            KeyCode::Down => send(app, InputAction::MenuNext),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
                send(app, InputAction::MenuInc)
            }
            KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Left => {
                send(app, InputAction::MenuDec)
            }
            KeyCode::Enter => send(app, InputAction::MenuApply),
            KeyCode::Esc => send(app, InputAction::MenuCancel),
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            _ => {}
        },
        Scene::Table => match code {
            KeyCode::Char('m') | KeyCode::Char('M') => send(app, InputAction::ToggleMenu),
            KeyCode::Char(' ') => send(app, InputAction::NewHand),
            KeyCode::Char('f') | KeyCode::Char('F') => send(app, InputAction::Fold),
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Char('k') | KeyCode::Char('K') => {
                send(app, InputAction::CheckCall)
            }
            KeyCode::Char('b') | KeyCode::Char('B') => send(app, InputAction::BetMin),
            KeyCode::Char('r') | KeyCode::Char('R') => send(app, InputAction::RaiseMin),
            KeyCode::Char('a') | KeyCode::Char('A') => send(app, InputAction::AmountOpen),
            KeyCode::Char('o') | KeyCode::Char('O') => send(app, InputAction::ToggleOdds),
            KeyCode::Char('w') | KeyCode::Char('W') => send(app, InputAction::Save),
            KeyCode::Char('l') | KeyCode::Char('L') => send(app, InputAction::Load),
            KeyCode::Char('q') | KeyCode::Char('Q') => return !app.session().game().in_progress(),
            _ => {}
        },
    }
    false
}

fn toggle(app: &mut AppState, action: InputAction) -> bool {
    let _ = app.handle_input(action);
    false
}
