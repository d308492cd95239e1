use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::data::top_prize;
use crate::session::GameSession;

pub fn render(frame: &mut Frame, area: Rect, session: &GameSession) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .split(area);

    let headline = if session.winnings() == top_prize() {
        "CROREPATI!"
    } else {
        "Game Over!"
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            headline,
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
        Line::from("You won:".fg(Color::White)),
        Line::from(""),
        Line::from(Span::styled(
            session.winnings(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
        Line::from(""),
        Line::from("r play again  ·  q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::Yellow),
    );
    frame.render_widget(widget, chunks[1]);
}
