use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::data::{MAX_LEVEL, PRIZE_LADDER, top_prize};

const KEYS: [(&str, &str); 4] = [
    ("↑/↓ j/k", "move"),
    ("a-d 1-4", "lock answer"),
    ("n", "next question"),
    ("q", "quit"),
];

/// Safe-money stops, lowest first, three per line.
fn milestone_lines() -> Vec<Line<'static>> {
    let milestones: Vec<_> = PRIZE_LADDER.iter().filter(|entry| entry.is_milestone).collect();
    milestones
        .chunks(3)
        .map(|row| {
            let mut spans = Vec::new();
            for entry in row {
                if !spans.is_empty() {
                    spans.push(Span::raw("  ·  ").fg(Color::DarkGray));
                }
                spans.push(Span::raw(format!("Q{} ", entry.level)).fg(Color::DarkGray));
                spans.push(Span::raw(entry.amount).fg(Color::Cyan));
            }
            Line::from(spans)
        })
        .collect()
}

pub fn render(frame: &mut Frame, area: Rect) {
    let [_, panel, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(15),
        Constraint::Fill(1),
    ])
    .areas(area);

    let mut content = vec![
        Line::from(""),
        Line::from("KAUN BANEGA CROREPATI".fg(Color::Yellow).bold()),
        Line::from(format!("{} sawaal · {} tak", MAX_LEVEL, top_prize()).fg(Color::White)),
        Line::from(""),
    ];
    content.extend(milestone_lines());
    content.push(Line::from(""));
    content.extend(KEYS.iter().map(|(key, action)| {
        Line::from(vec![
            Span::raw(format!("{:>9}  ", key)).fg(Color::Green),
            Span::raw(format!("{:<14}", action)).fg(Color::Gray),
        ])
    }));
    content.push(Line::from(""));
    content.push(Line::from("ENTER to play".fg(Color::Green).bold()));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Color::Yellow),
    );
    frame.render_widget(widget, panel);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_welcome_lists_milestones_and_top_prize() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(frame, frame.area())).unwrap();
        let text = crate::ui::buffer_text(terminal.backend().buffer());

        assert!(text.contains("KAUN BANEGA CROREPATI"));
        assert!(text.contains("15 sawaal"));
        assert!(text.contains("₹7 Crores"));
        assert!(text.contains("Q4 ₹5,000"));
        assert!(text.contains("Q12 ₹12,50,000"));
        assert!(!text.contains("Q5 "));
        assert!(text.contains("ENTER to play"));
    }
}
