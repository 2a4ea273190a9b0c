mod cards;
mod detail;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    cards::render(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if let Some(record) = app.controller.selection() {
        detail::render(frame, record);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let loaded = app.controller.collection().len();
    let title = match app.controller.state().total {
        Some(total) => format!("dexgrid - {} ({} of {})", app.catalog_name(), loaded, total),
        None => format!("dexgrid - {} ({})", app.catalog_name(), loaded),
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        )])
    } else if app.controller.is_loading() {
        Line::from(vec![Span::styled(
            format!("{} Loading...", SPINNER[app.ticks % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = if app.dialog_open() {
            "o: open artwork | y: yank url | q/Esc/Enter: close"
        } else {
            "h/j/k/l: nav | Ctrl+d/u: page | g/G: top/bottom | Enter: details | o/y: artwork | q: quit"
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
