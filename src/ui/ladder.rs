use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::data::PRIZE_LADDER;

/// Prize ladder, top prize first, with the current level highlighted.
pub fn render(frame: &mut Frame, area: Rect, current_level: u8) {
    let lines: Vec<Line> = PRIZE_LADDER
        .iter()
        .rev()
        .map(|entry| {
            let style = if entry.level == current_level {
                Style::default().fg(Color::Black).bg(Color::Yellow).bold()
            } else if entry.level < current_level {
                Style::default().fg(Color::Green)
            } else if entry.is_milestone {
                Style::default().fg(Color::White).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if entry.is_milestone { "◆" } else { " " };

            Line::from(Span::styled(
                format!("{} Q{:<2} {:>14}", marker, entry.level, entry.amount),
                style,
            ))
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(" Prize Money ")
            .title_style(Style::default().fg(Color::Yellow).bold())
            .borders(Borders::ALL)
            .border_style(Color::Yellow)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
