//! # kbc-quiz
//!
//! A terminal quiz game in the style of "Kaun Banega Crorepati": fifteen
//! questions of rising difficulty along a fixed prize ladder.
//!
//! Questions are generated remotely, cached locally for a day, and replaced
//! by bundled fallback questions whenever the API is unconfigured, failing,
//! or out of quota.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use kbc_quiz::{
//!     AcquisitionPipeline, FallbackSet, Game, GameError, MemoryStore, OfflineProvider,
//!     QuestionCache, SilentPlayer, SystemClock,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), GameError> {
//!     let cache = QuestionCache::new(Box::new(MemoryStore::new()), Arc::new(SystemClock));
//!     let pipeline =
//!         AcquisitionPipeline::new(cache, Arc::new(OfflineProvider), FallbackSet::builtin());
//!
//!     Game::new(pipeline, Box::new(SilentPlayer)).run().await
//! }
//! ```

mod app;
pub mod audio;
pub mod cache;
pub mod clock;
pub mod config;
pub mod data;
mod error;
mod models;
pub mod pipeline;
pub mod provider;
pub mod session;
pub mod storage;
pub mod terminal;
pub mod timers;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc;

pub use app::App;
pub use audio::{AudioCue, AudioPlayer, CommandPlayer, SilentPlayer};
pub use cache::{CacheStats, QuestionCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use data::{FallbackSet, LoadError, load_fallback_from_json};
pub use error::GameError;
pub use models::{NUM_OPTIONS, PrizeLadderEntry, Question, QuestionError};
pub use pipeline::{Acquisition, AcquisitionPipeline, Resolved, Source};
pub use provider::{GeminiConfig, GeminiProvider, OfflineProvider, ProviderError, QuestionProvider};
pub use session::{GameSession, Phase};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use timers::GameEvent;

const INPUT_POLL: Duration = Duration::from_millis(50);

/// A game instance that can be run in the terminal.
pub struct Game {
    app: App,
    events: mpsc::UnboundedReceiver<GameEvent>,
}

impl Game {
    pub fn new(pipeline: AcquisitionPipeline, audio: Box<dyn AudioPlayer>) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            app: App::new(Arc::new(pipeline), audio, tx),
            events,
        }
    }

    /// Run the game in the terminal.
    ///
    /// This takes over the terminal and returns when the player quits.
    pub async fn run(mut self) -> Result<(), GameError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app, &mut self.events).await;
        self.app.shutdown();
        terminal::restore()?;
        result
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::GameTerminal,
    app: &mut App,
    events: &mut mpsc::UnboundedReceiver<GameEvent>,
) -> Result<(), GameError> {
    loop {
        while let Ok(game_event) = events.try_recv() {
            app.handle_event(game_event);
        }

        terminal.draw(|frame| ui::render(frame, app))?;
        app.advance_tick();

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if handle_input(app, key.code).await {
                    break;
                }
            }
        } else {
            tokio::task::yield_now().await;
        }
    }

    Ok(())
}

/// Returns true if the game should exit.
async fn handle_input(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
        app.should_quit = true;
        return true;
    }

    match app.session().phase() {
        Phase::Welcome => handle_welcome_input(app, key),
        Phase::Ready => handle_question_input(app, key),
        Phase::Revealed { correct: true, .. } => handle_revealed_input(app, key),
        Phase::GameOver => handle_game_over_input(app, key).await,
        Phase::Loading | Phase::Locked { .. } | Phase::Revealed { .. } => {}
    }
    false
}

fn handle_welcome_input(app: &mut App, key: KeyCode) {
    if key == KeyCode::Enter {
        app.start_game();
    }
}

fn handle_question_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.lock_highlighted(),
        KeyCode::Char(c) => {
            if let Some(option) = option_for_key(c) {
                app.lock_option(option);
            }
        }
        _ => {}
    }
}

fn handle_revealed_input(app: &mut App, key: KeyCode) {
    if matches!(key, KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N')) {
        app.next_question();
    }
}

async fn handle_game_over_input(app: &mut App, key: KeyCode) {
    if matches!(key, KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter) {
        app.restart().await;
    }
}

/// Maps `a`-`d` and `1`-`4` onto option indices.
fn option_for_key(c: char) -> Option<usize> {
    match c.to_ascii_lowercase() {
        'a' | '1' => Some(0),
        'b' | '2' => Some(1),
        'c' | '3' => Some(2),
        'd' | '4' => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_keys() {
        assert_eq!(option_for_key('a'), Some(0));
        assert_eq!(option_for_key('D'), Some(3));
        assert_eq!(option_for_key('3'), Some(2));
        assert_eq!(option_for_key('e'), None);
    }
}
