use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use holdem_rs::config::TableConfig;
use holdem_rs::logging::init_logging;
use holdem_rs::tui::{app::AppState, controller};
use ratatui::prelude::*;
use std::fs::File;
use std::io::{self, IsTerminal, Stdout};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

const LOG_FILE: &str = "holdem-rs.log";

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> ExitCode {
    if !io::stdout().is_terminal() {
        println!(
            "holdem-rs needs a real terminal (TTY). Run it in a terminal and press q to quit. Version: {}",
            holdem_rs::VERSION
        );
        return ExitCode::SUCCESS;
    }

    // The TUI owns stdout, so logs go to a file.
    match File::create(LOG_FILE) {
        Ok(file) => {
            init_logging(None, Mutex::new(file));
        }
        Err(err) => eprintln!("holdem-rs: logging disabled, cannot create {LOG_FILE}: {err}"),
    }

    let config = match TableConfig::load_from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("holdem-rs: {err}");
            return ExitCode::from(2);
        }
    };
    let mut app = match AppState::new(config) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("holdem-rs: {err}");
            return ExitCode::from(2);
        }
    };
    tracing::info!(version = holdem_rs::VERSION, "starting");

    let result = setup_terminal().and_then(|mut terminal| {
        let res = controller::run(&mut terminal, &mut app, Duration::from_millis(100));
        // Always attempt to restore the terminal.
        restore_terminal(terminal)?;
        res
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "terminal error");
            eprintln!("holdem-rs: {err}");
            ExitCode::FAILURE
        }
    }
}
