use ratatui::{prelude::*, widgets::Paragraph};

use crate::session::GameSession;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub fn render(frame: &mut Frame, area: Rect, session: &GameSession, tick: usize) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .split(area);

    let content = vec![
        Line::from(Span::styled(
            format!("Question {}", session.level()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Computer Ji, prashn dhund rahe hain...", SPINNER[tick % SPINNER.len()]),
            Style::default().fg(Color::Yellow).bold(),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}
