mod game_over;
mod ladder;
mod loading;
mod question;
mod welcome;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::session::Phase;

const LADDER_WIDTH: u16 = 28;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let session = app.session();
    match session.phase() {
        Phase::Welcome => welcome::render(frame, area),
        Phase::GameOver => game_over::render(frame, area, session),
        Phase::Loading => {
            let (main, side) = split_with_ladder(area);
            loading::render(frame, main, session, app.tick());
            ladder::render(frame, side, session.level());
        }
        Phase::Ready | Phase::Locked { .. } | Phase::Revealed { .. } => {
            let (main, side) = split_with_ladder(area);
            question::render(frame, main, session);
            ladder::render(frame, side, session.level());
        }
    }
}

fn split_with_ladder(area: Rect) -> (Rect, Rect) {
    let chunks =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(LADDER_WIDTH)]).split(area);
    (chunks[0], chunks[1])
}

#[cfg(test)]
pub(crate) fn buffer_text(buffer: &Buffer) -> String {
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
