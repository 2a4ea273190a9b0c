use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::grid::CARD_HEIGHT;
use crate::types::DetailRecord;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let collection = app.controller.collection();
    if collection.is_empty() {
        let message = if app.controller.is_loading() {
            "Loading catalog..."
        } else {
            "No entries loaded"
        };
        let empty = Paragraph::new(message)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let visible = app.grid.visible_range(collection.len());
    let columns = app.grid.columns;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            (0..app.grid.rows)
                .map(|_| Constraint::Length(CARD_HEIGHT))
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(area);

    for (slot, index) in visible.enumerate() {
        let row = slot / columns;
        let col = slot % columns;
        let Some(row_area) = rows.get(row) else {
            break;
        };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..columns).map(|_| Constraint::Ratio(1, columns as u32)))
            .split(*row_area);

        render_card(frame, &collection[index], index, index == app.highlight, cells[col]);
    }
}

fn render_card(frame: &mut Frame, record: &DetailRecord, index: usize, highlighted: bool, area: Rect) {
    let border_style = if highlighted {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title_style = if highlighted {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let w = area.width.saturating_sub(2) as usize;
    let abilities = record
        .abilities
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let abilities = if abilities.chars().count() > w {
        let cut: String = abilities.chars().take(w.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        abilities
    };

    let artwork = if record.has_artwork() {
        Span::styled("▣ artwork", Style::default().fg(Color::Green))
    } else {
        Span::styled("□ no artwork", Style::default().fg(Color::DarkGray))
    };

    let lines = vec![
        Line::from(Span::styled(record.name.clone(), title_style)).centered(),
        Line::from(vec![
            Span::styled(
                format!("{:.1} m", f64::from(record.height) / 10.0),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(" | "),
            Span::styled(
                format!("{:.1} kg", f64::from(record.weight) / 10.0),
                Style::default().fg(Color::Cyan),
            ),
        ])
        .centered(),
        Line::from(Span::styled(abilities, Style::default().fg(Color::Gray))).centered(),
        Line::from(artwork).centered(),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(
                format!(" #{} ", index + 1),
                Style::default().fg(Color::DarkGray),
            )),
    );

    frame.render_widget(card, area);
}
