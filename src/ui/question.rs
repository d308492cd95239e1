use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::models::Question;
use crate::session::{Banner, GameSession, Phase};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, session: &GameSession) {
    let Some(question) = session.question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_progress(frame, chunks[0], session);
    render_banner(frame, chunks[1], session.banner());
    render_question_text(frame, chunks[2], session.level(), question);
    render_options(frame, chunks[3], question, session);
    render_controls(frame, chunks[4], session.phase());
}

fn render_progress(frame: &mut Frame, area: Rect, session: &GameSession) {
    let progress = format!(
        "Question {}/15  ·  playing for {}  ·  won {}",
        session.level(),
        session.current_prize(),
        session.winnings()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_banner(frame: &mut Frame, area: Rect, banner: &Banner) {
    let line = if let Some(error) = &banner.error {
        Line::from(Span::styled(
            format!("API error: {}. Using fallback question.", error),
            Style::default().fg(Color::Red),
        ))
    } else if banner.quota_exhausted {
        Line::from(Span::styled(
            "API quota exhausted, playing bundled questions",
            Style::default().fg(Color::Yellow),
        ))
    } else if banner.using_cache {
        Line::from(Span::styled(
            "Question served from cache",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, level: u8, question: &Question) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Question {}", level),
            Style::default().fg(Color::LightYellow),
        )),
        Line::from(Span::styled(
            question.text(),
            Style::default().fg(Color::Yellow).bold(),
        )),
    ];
    if let Some(translation) = question.translation() {
        lines.push(Line::from(Span::styled(
            translation,
            Style::default().fg(Color::Gray).italic(),
        )));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::Yellow)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

/// Style for one option given where the round stands.
fn option_style(index: usize, question: &Question, phase: Phase, cursor: usize) -> (Style, &'static str) {
    match phase {
        Phase::Revealed { selected, .. } if index == selected && !question.is_correct(index) => {
            (Style::default().fg(Color::White).bg(Color::Red).bold(), "x")
        }
        Phase::Revealed { .. } if question.is_correct(index) => {
            (Style::default().fg(Color::White).bg(Color::Green).bold(), "+")
        }
        Phase::Locked { selected } if index == selected => {
            (Style::default().fg(Color::Black).bg(Color::LightYellow).bold(), "*")
        }
        Phase::Ready if index == cursor => (Style::default().fg(Color::Cyan).bold(), ">"),
        _ => (Style::default().fg(Color::Gray), " "),
    }
}

fn render_options(frame: &mut Frame, area: Rect, question: &Question, session: &GameSession) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options().len() * 2);

    for (index, option) in question.options().iter().enumerate() {
        let (style, marker) = option_style(index, question, session.phase(), session.cursor());

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}: ", OPTION_LABELS[index]), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_controls(frame: &mut Frame, area: Rect, phase: Phase) {
    let (text, color) = match phase {
        Phase::Ready => ("j/k navigate  ·  enter or a-d lock  ·  q quit", Color::DarkGray),
        Phase::Locked { .. } => ("Lock kiya jaye... ", Color::LightYellow),
        Phase::Revealed { correct: true, .. } => ("enter next question  ·  q quit", Color::Green),
        Phase::Revealed { correct: false, .. } => ("Galat jawab", Color::Red),
        _ => ("", Color::DarkGray),
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(color);
    frame.render_widget(widget, area);
}
