use crate::cards::Card;
use crate::game::{Game, Player, PlayerStatus, Street};
use crate::persistence::SeatKind;
use crate::pot::{side_pots, Contribution};
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let game = app.session().game();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(5), // board
            Constraint::Min(3),    // seats
            Constraint::Length(5), // status
        ])
        .split(f.area());

    let dealer_name = game.player(game.dealer()).map(Player::name).unwrap_or("-");
    let header_lines = vec![
        Line::from(format!(
            "Hand #{}   Blinds {}/{} (level {})   Dealer: {}",
            game.hand_number(),
            game.small_blind(),
            game.big_blind(),
            app.session().blind_level() + 1,
            dealer_name,
        )),
        Line::from(format!(
            "{}   Bet: {}   Min raise: {}",
            pot_line(game),
            game.pot().current_bet,
            game.pot().min_raise
        )),
    ];
    let header = Paragraph::new(header_lines)
        .block(Block::default().title("holdem-rs").borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    draw_board(f, chunks[1], game);
    match side_panel(app) {
        Some((title, lines)) => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
                .split(chunks[2]);
            draw_seats(f, cols[0], app);
            let panel = Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().title(title).borders(Borders::ALL));
            f.render_widget(panel, cols[1]);
        }
        None => draw_seats(f, chunks[2], app),
    }
    draw_status(f, chunks[3], app);

    if app.help_open() {
        draw_help(f);
    } else if app.history_open() {
        draw_history(f, app);
    } else if app.stats_open() {
        draw_stats(f, app);
    } else if app.amount_entry_active() {
        draw_amount_entry(f, app);
    }
}

fn draw_board(f: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default().title(format!("Board ({})", game.street())).borders(Borders::ALL);
    let board_inner = inner(area);
    f.render_widget(block, area);
    let card_width = board_inner.width / 5;
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(card_width); 5])
        .split(board_inner);
    let cards = game.board().as_slice();
    let newest = match game.street() {
        Street::Flop => 0..3,
        Street::Turn => 3..4,
        Street::River => 4..5,
        _ => 0..0,
    };
    for (i, slot) in slots.iter().enumerate() {
        let border = newest.contains(&i).then_some(Color::Yellow);
        render_card(f, *slot, cards.get(i).copied(), border);
    }
}

fn draw_seats(f: &mut Frame, area: Rect, app: &AppState) {
    let players = app.session().game().players();
    let total = players.len();
    let top = (total + 1) / 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(area);
    for (row, range) in [(0usize, 0..top), (1, top..total)] {
        let cols = range.len() as u32;
        if cols == 0 {
            continue;
        }
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..cols).map(|_| Constraint::Ratio(1, cols)).collect::<Vec<_>>())
            .split(rows[row]);
        // Bottom row runs right to left so seats read clockwise.
        for (c, seat) in range.clone().enumerate() {
            let cell = if row == 0 { cells[c] } else { cells[cells.len() - 1 - c] };
            render_seat(f, cell, app, seat, &players[seat]);
        }
    }
}

fn render_seat(f: &mut Frame, area: Rect, app: &AppState, seat: usize, p: &Player) {
    let session = app.session();
    let game = session.game();
    let is_human = session.human_seat() == Some(seat);
    let mut title = p.name().to_string();
    if seat == game.dealer() && game.hand_number() > 0 {
        title.push_str(" [D]");
    }
    if game.sb_pos() == Some(seat) && game.in_progress() {
        title.push_str(" [SB]");
    }
    if game.bb_pos() == Some(seat) && game.in_progress() {
        title.push_str(" [BB]");
    }
    if let Some(SeatKind::Bot(profile)) = session.seats().get(seat) {
        title.push_str(&format!(" [{:?}]", profile.difficulty));
    }

    let acting = game.to_act() == Some(seat);
    let won = !game.in_progress() && game.winners().contains(&seat);
    let border = if won {
        Color::Green
    } else if acting {
        Color::Yellow
    } else if matches!(p.status(), PlayerStatus::Folded) {
        Color::DarkGray
    } else if matches!(p.status(), PlayerStatus::AllIn) {
        Color::LightRed
    } else if is_human {
        Color::Cyan
    } else {
        Color::White
    };
    let block = Block::default().title(title).borders(Borders::ALL).border_style(Style::default().fg(border));
    f.render_widget(block, area);

    let status = match p.status() {
        PlayerStatus::Active if p.hole().is_some() => "In",
        PlayerStatus::AllIn => "All-in",
        _ if p.stack() == 0 && p.hole().is_none() => "Out",
        _ => "Folded",
    };
    let mut lines = vec![
        Line::from(format!("Stack: ${}", p.stack())),
        Line::from(format!("Bet: {}   {status}", p.bet())),
        Line::from(format!("Last: {}", p.last_action().unwrap_or("--"))),
    ];
    let shown = game.showdown_results().get(seat).copied().flatten();
    if let (false, Some(result)) = (game.in_progress(), shown) {
        lines.push(Line::from(Span::styled(result.describe(), Style::default().add_modifier(Modifier::BOLD))));
    }

    let body = inner(area);
    let reveal = is_human || (!game.in_progress() && shown.is_some());
    let hole = p.hole().filter(|_| reveal);
    let (text_area, cards_area) = if hole.is_some() && body.height > 4 {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(body);
        (split[0], Some(split[1]))
    } else {
        (body, None)
    };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), text_area);
    if let (Some(h), Some(area)) = (hole, cards_area) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(area.width / 2); 2])
            .split(area);
        render_card(f, halves[0], Some(h.first()), Some(Color::Cyan));
        render_card(f, halves[1], Some(h.second()), Some(Color::Cyan));
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState) {
    let session = app.session();
    let game = session.game();
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(inner(area));

    let mut left: Vec<Line> = Vec::new();
    if session.is_over() {
        left.push(Line::from("Game over. Press M for a new table."));
    } else if !game.in_progress() {
        left.push(Line::from(if game.hand_number() == 0 {
            "Press Space to deal.".to_string()
        } else {
            format!("Hand complete, {}. Space deals the next hand.", winners_line(game))
        }));
    } else if app.can_act() {
        let legal = game.legal_actions();
        let on = |enabled: bool| {
            if enabled {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            }
        };
        let call_label = if legal.check {
            "C check".to_string()
        } else {
            format!("C call {}", legal.call.unwrap_or(0))
        };
        left.push(Line::from(vec![
            Span::raw("Your turn: "),
            Span::styled("F fold", on(legal.fold)),
            Span::raw("  "),
            Span::styled(call_label, on(legal.check || legal.call.is_some())),
            Span::raw("  "),
            Span::styled("B bet", on(legal.bet.is_some())),
            Span::raw("  "),
            Span::styled("R raise", on(legal.raise.is_some())),
            Span::raw("  "),
            Span::styled("A amount", on(legal.bet.is_some() || legal.raise.is_some())),
        ]));
    } else if let Some(seat) = game.to_act() {
        let name = game.player(seat).map(Player::name).unwrap_or("?");
        left.push(Line::from(format!("Waiting for {name}...")));
    }
    if app.show_odds() {
        let odds = match app.odds() {
            Some(eq) => format!(
                "Odds: win {:.1}%  tie {:.1}%  lose {:.1}%  ({} trials)",
                eq.win * 100.0,
                eq.tie * 100.0,
                eq.loss * 100.0,
                eq.trials
            ),
            None => "Odds: --".to_string(),
        };
        left.push(Line::from(Span::styled(odds, Style::default().fg(Color::Cyan))));
    }
    if let Some(msg) = app.message() {
        left.push(Line::from(Span::styled(msg.to_string(), Style::default().fg(Color::Red))));
    }

    let right = vec![
        Line::from("O odds  S stats  H history"),
        Line::from("W save  L load  M menu  ? help"),
    ];
    f.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(Paragraph::new(right).alignment(Alignment::Right), cols[1]);
}

/// Final standings once the session is over, otherwise the last showdown ranked best first.
fn side_panel(app: &AppState) -> Option<(&'static str, Vec<Line<'static>>)> {
    let session = app.session();
    let game = session.game();
    if session.is_over() {
        let lines = game
            .standings()
            .into_iter()
            .enumerate()
            .filter_map(|(place, seat)| {
                let p = game.player(seat)?;
                let style = if session.human_seat() == Some(seat) {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                };
                let text = if p.stack() == 0 {
                    format!("{}. {}  busted", place + 1, p.name())
                } else {
                    format!("{}. {}  ${}", place + 1, p.name(), p.stack())
                };
                Some(Line::from(Span::styled(text, style)))
            })
            .collect();
        return Some(("Final standings", lines));
    }
    if game.in_progress() {
        return None;
    }
    let ranking = game.showdown_ranking();
    if ranking.is_empty() {
        return None;
    }
    let mut lines = Vec::new();
    for (place, (seat, result)) in ranking.iter().enumerate() {
        let name = game.player(*seat).map(Player::name).unwrap_or("?");
        let won = game.payouts().get(*seat).copied().unwrap_or(0);
        let style = if won > 0 {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mut head = format!("{}. {name}  {}", place + 1, result.describe());
        if won > 0 {
            head.push_str(&format!("  +{won}"));
        }
        lines.push(Line::from(Span::styled(head, style)));
        let mut cards: Vec<Span<'static>> = vec![Span::raw("   ")];
        for card in result.best_five {
            let color = if card.suit().is_red() { Color::Red } else { Color::White };
            cards.push(Span::styled(format!("{} ", card.pretty()), Style::default().fg(color)));
        }
        lines.push(Line::from(cards));
    }
    Some(("Showdown", lines))
}

fn winners_line(game: &Game) -> String {
    let names: Vec<String> = game
        .winners()
        .iter()
        .filter_map(|&s| {
            let won = game.payouts().get(s).copied().unwrap_or(0);
            game.player(s).map(|p| format!("{} +{won}", p.name()))
        })
        .collect();
    if names.is_empty() {
        "no winner".into()
    } else {
        names.join(", ")
    }
}

fn draw_history(f: &mut Frame, app: &AppState) {
    let game = app.session().game();
    let area = centered_rect(70, 80, f.area());
    let mut lines: Vec<Line> = Vec::new();
    let entries = game.history_recent_offset(AppState::HISTORY_PAGE_SIZE, app.history_offset());
    if entries.is_empty() {
        lines.push(Line::from("No actions yet."));
    }
    for entry in entries {
        let name = game.player(entry.seat).map(Player::name).unwrap_or("?");
        let amount = entry.amount.map(|v| format!(" {v}")).unwrap_or_default();
        lines.push(Line::from(format!("[{}] {name} {}{amount}", entry.street, entry.verb.label())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Up/Down scroll, H or Esc closes",
        Style::default().add_modifier(Modifier::DIM),
    )));
    f.render_widget(Clear, area);
    f.render_widget(Block::default().title("History").borders(Borders::ALL), area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_stats(f: &mut Frame, app: &AppState) {
    let area = centered_rect(80, 70, f.area());
    let header = Row::new(["Player", "Hands", "Won", "Win %", "Net", "Biggest", "Best", "Fold %"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = app.session().game().players().iter().map(|p| {
        let s = p.stats();
        Row::new([
            p.name().to_string(),
            s.hands_played.to_string(),
            s.hands_won.to_string(),
            format!("{:.0}", s.win_rate() * 100.0),
            format!("{:+}", s.net_profit()),
            s.biggest_pot_won.to_string(),
            s.best_hand.map_or("--".to_string(), |c| c.name().to_string()),
            format!("{:.0}", s.fold_rate() * 100.0),
        ])
    });
    let widths = [
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(7),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title("Statistics (S or Esc closes)").borders(Borders::ALL));
    f.render_widget(Clear, area);
    f.render_widget(table, area);
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Table", bold)),
        Line::from("Space  deal the next hand"),
        Line::from("F      fold"),
        Line::from("C / K  check or call"),
        Line::from("B      bet the minimum"),
        Line::from("R      raise the minimum"),
        Line::from("A      enter a bet or raise amount"),
        Line::from("O      show or hide your odds"),
        Line::from("S      statistics"),
        Line::from("H      hand history"),
        Line::from("W / L  save / load between hands"),
        Line::from("M      menu"),
        Line::from(""),
        Line::from(Span::styled("Amount entry", bold)),
        Line::from("0-9 edit, Backspace delete, +/- one big blind, Enter submit, Esc cancel"),
        Line::from(""),
        Line::from("? or Esc closes this help"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(Block::default().title("Help").borders(Borders::ALL), area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_amount_entry(f: &mut Frame, app: &AppState) {
    let legal = app.session().game().legal_actions();
    let (title, range) = match (&legal.bet, &legal.raise) {
        (Some(r), _) => ("Bet", Some(r.clone())),
        (None, Some(r)) => ("Raise to", Some(r.clone())),
        _ => ("Amount", None),
    };
    let area = centered_rect(50, 30, f.area());
    let mut lines = vec![Line::from(format!("{title}: {}", app.amount_entry_text().unwrap_or("")))];
    if let Some(r) = range {
        lines.push(Line::from(format!("Min {}  Max {} (all in)", r.start(), r.end())));
    }
    lines.push(Line::from("+/- one big blind, Enter submit, Esc cancel"));
    if let Some(err) = app.amount_entry_error() {
        lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
    }
    f.render_widget(Clear, area);
    f.render_widget(Block::default().title(title).borders(Borders::ALL), area);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner(area));
}

/// Total pot plus the main/side split once all-ins create more than one pot.
fn pot_line(game: &Game) -> String {
    let contributions: Vec<Contribution> = game
        .players()
        .iter()
        .enumerate()
        .map(|(seat, p)| Contribution { seat, amount: p.contributed(), live: p.is_live() })
        .collect();
    let pots = side_pots(&contributions);
    let total = game.pot().total;
    if pots.len() > 1 && game.in_progress() {
        let parts: Vec<String> = pots.iter().map(|p| p.amount.to_string()).collect();
        format!("Pot: ${total} = {}", parts.join(" + "))
    } else {
        format!("Pot: ${total}")
    }
}

fn render_card(f: &mut Frame, area: Rect, card: Option<Card>, border: Option<Color>) {
    let mut block = Block::default().borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    f.render_widget(block, area);
    let content = match card {
        Some(c) => {
            let color = if c.suit().is_red() { Color::Red } else { Color::White };
            Line::from(Span::styled(c.pretty(), Style::default().fg(color)))
        }
        None => Line::from("[  ]"),
    };
    f.render_widget(Paragraph::new(content).alignment(Alignment::Center), inner(area));
}
