use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

const LOGO: &str = r#"
 _   _       _     _
| | | | ___ | | __| | ___ _ __ ___
| |_| |/ _ \| |/ _` |/ _ \ '_ ` _ \
|  _  | (_) | | (_| |  __/ | | | | |
|_| |_|\___/|_|\__,_|\___|_| |_| |_|
"#;

pub(super) fn draw_menu(f: &mut Frame, app: &AppState) {
    let area = centered_rect(80, 80, f.area());
    let block = Block::default().title("holdem-rs").borders(Borders::ALL);
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    let inner_all = inner(area);

    let logo_lines: Vec<Line> = LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Green))))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(logo_lines.len() as u16 + 1), Constraint::Min(3)])
        .split(inner_all);
    f.render_widget(Paragraph::new(logo_lines).alignment(Alignment::Center), rows[0]);

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "New table:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (i, item) in app.menu_items_display().into_iter().enumerate() {
        let style = if i == app.menu_index {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(item, style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter] Deal in  [Esc] Back  [Up/Down] Move  [+/-] Adjust  [Q] Quit",
        Style::default().add_modifier(Modifier::DIM),
    )));
    if let Some(msg) = app.message() {
        lines.push(Line::from(Span::styled(msg.to_string(), Style::default().fg(Color::Red))));
    }
    let para = Paragraph::new(lines).wrap(Wrap { trim: true }).alignment(Alignment::Center);
    f.render_widget(para, rows[1]);
}
