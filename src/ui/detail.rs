use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::types::DetailRecord;

/// Render the detail dialog for the selected record, centered over the grid
pub fn render(frame: &mut Frame, record: &DetailRecord) {
    let height = (record.abilities.len() + 10).min(20) as u16;
    let area = centered_rect(60, height, frame.area());
    frame.render_widget(Clear, area);

    let label = Style::default().fg(Color::Gray);

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Artwork: ", label),
            if record.has_artwork() {
                Span::styled(record.image_uri.clone(), Style::default().fg(Color::Cyan))
            } else {
                Span::styled("none", Style::default().fg(Color::DarkGray))
            },
        ]),
        Line::from(vec![
            Span::styled("Height: ", label),
            Span::raw(format!("{} decimetres", record.height)),
        ]),
        Line::from(vec![
            Span::styled("Weight: ", label),
            Span::raw(format!("{} hectograms", record.weight)),
        ]),
        Line::from(""),
    ];

    lines.extend(record.abilities.iter().enumerate().map(|(i, ability)| {
        Line::from(vec![
            Span::styled(format!("Ability {}: ", i + 1), label),
            Span::styled(ability.to_string(), Style::default().fg(Color::Yellow)),
        ])
    }));

    lines.push(Line::from(""));
    lines.push(
        Line::from(vec![
            Span::styled("[q]", Style::default().fg(Color::Green)),
            Span::raw(" close"),
        ])
        .alignment(Alignment::Right),
    );

    let dialog = Paragraph::new(lines)
        .block(
            Block::default().borders(Borders::ALL).title(Span::styled(
                format!(" {} ", record.name),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(dialog, area);
}

/// Create a centered rect of at most `width` x `height` inside `outer`
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let popup_width = width.min(outer.width);
    let popup_height = height.min(outer.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((outer.height.saturating_sub(popup_height)) / 2),
            Constraint::Length(popup_height),
            Constraint::Min(0),
        ])
        .split(outer);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((outer.width.saturating_sub(popup_width)) / 2),
            Constraint::Length(popup_width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
