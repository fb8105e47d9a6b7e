use crossterm::event::KeyCode;
use holdem_rs::config::TableConfig;
use holdem_rs::tui::app::{AppState, InputAction, Scene};
use holdem_rs::tui::controller::handle_key;

fn app() -> AppState {
    let cfg = TableConfig { seed: Some(11), bot_delay_ms: 0, equity_trials: 40, ..TableConfig::default() };
    let dir = std::env::temp_dir().join(format!("holdem-rs-smoke-{}.json", std::process::id()));
    AppState::new(cfg).unwrap().with_save_path(dir)
}

fn table_app() -> AppState {
    let mut app = app();
    assert!(app.handle_input(InputAction::MenuApply));
    app
}

/// Tick until the human is due to act or the hand ends.
fn run_to_human(app: &mut AppState) {
    for _ in 0..200 {
        if app.can_act() || !app.session().game().in_progress() {
            return;
        }
        app.tick();
    }
}

#[test]
fn menu_navigation_and_apply() {
    let mut app = app();
    assert_eq!(app.scene, Scene::Menu);
    let start = app.menu_index;
    app.handle_input(InputAction::MenuNext);
    assert_ne!(app.menu_index, start);
    app.handle_input(InputAction::MenuPrev);
    assert_eq!(app.menu_index, start);

    // First item is the bot count.
    app.handle_input(InputAction::MenuInc);
    assert!(app.handle_input(InputAction::MenuApply));
    assert_eq!(app.scene, Scene::Table);
    assert_eq!(app.session().game().players().len(), 5);
}

#[test]
fn overlays_are_exclusive() {
    let mut app = table_app();
    app.handle_input(InputAction::ToggleHelp);
    assert!(app.help_open());
    app.handle_input(InputAction::ToggleHistory);
    assert!(!app.help_open());
    assert!(app.history_open());
    app.handle_input(InputAction::ToggleStats);
    assert!(app.stats_open() && !app.history_open());
    app.handle_input(InputAction::ToggleStats);
    assert!(!app.stats_open());
}

#[test]
fn amount_entry_edit_and_cancel() {
    let mut app = table_app();
    assert!(app.handle_input(InputAction::NewHand));
    run_to_human(&mut app);
    if !app.can_act() {
        return;
    }
    let legal = app.session().game().legal_actions();
    let Some(range) = legal.bet.clone().or(legal.raise.clone()) else {
        return;
    };
    let expected = range.start().to_string();

    assert!(app.handle_input(InputAction::AmountOpen));
    assert!(app.amount_entry_active());
    assert_eq!(app.amount_entry_text(), Some(expected.as_str()));

    app.handle_input(InputAction::AmountDigit(5));
    let appended = format!("{expected}5");
    assert_eq!(app.amount_entry_text(), Some(appended.as_str()));

    app.handle_input(InputAction::AmountBackspace);
    assert_eq!(app.amount_entry_text(), Some(expected.as_str()));

    app.handle_input(InputAction::AmountIncBb);
    let plus_bb = (range.start() + app.session().game().big_blind()).to_string();
    assert_eq!(app.amount_entry_text(), Some(plus_bb.as_str()));

    app.handle_input(InputAction::AmountCancel);
    assert!(!app.amount_entry_active());
}

#[test]
fn out_of_range_amount_is_refused_and_kept_open() {
    let mut app = table_app();
    app.handle_input(InputAction::NewHand);
    run_to_human(&mut app);
    if !app.can_act() || !app.handle_input(InputAction::AmountOpen) {
        return;
    }
    for _ in 0..12 {
        app.handle_input(InputAction::AmountDigit(9));
    }
    assert!(!app.handle_input(InputAction::AmountSubmit));
    assert!(app.amount_entry_active());
    assert!(app.amount_entry_error().is_some());
    assert!(app.can_act(), "turn is not consumed by a refused amount");
}

#[test]
fn keys_drive_a_hand() {
    let mut app = table_app();
    assert!(!handle_key(&mut app, KeyCode::Char(' ')));
    assert!(app.session().game().in_progress());
    run_to_human(&mut app);
    if app.can_act() {
        handle_key(&mut app, KeyCode::Char('f'));
        assert!(!app.can_act());
    }
    handle_key(&mut app, KeyCode::Char('?'));
    assert!(app.help_open());
    handle_key(&mut app, KeyCode::Esc);
    assert!(!app.help_open());
}

#[test]
fn quitting_mid_hand_is_ignored() {
    let mut app = table_app();
    handle_key(&mut app, KeyCode::Char(' '));
    run_to_human(&mut app);
    if app.session().game().in_progress() {
        assert!(!handle_key(&mut app, KeyCode::Char('q')));
    }
}

#[test]
fn save_refused_mid_hand() {
    let mut app = table_app();
    app.handle_input(InputAction::NewHand);
    run_to_human(&mut app);
    if app.session().game().in_progress() {
        assert!(!app.handle_input(InputAction::Save));
        assert!(app.message().is_some());
    }
}
