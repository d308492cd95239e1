use std::sync::Arc;

use tokio::sync::mpsc;

use crate::audio::{AudioCue, AudioPlayer};
use crate::pipeline::{Acquisition, AcquisitionPipeline};
use crate::session::{Advance, GAME_OVER_DELAY, GameSession, Phase, REVEAL_DELAY};
use crate::timers::{GameEvent, SessionTasks};

/// Owns the running session and everything scheduled on its behalf.
pub struct App {
    session: GameSession,
    pipeline: Arc<AcquisitionPipeline>,
    tasks: SessionTasks,
    audio: Box<dyn AudioPlayer>,
    tick: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        pipeline: Arc<AcquisitionPipeline>,
        audio: Box<dyn AudioPlayer>,
        events: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        Self {
            session: GameSession::new(),
            pipeline,
            tasks: SessionTasks::new(events),
            audio,
            tick: 0,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn pipeline(&self) -> &AcquisitionPipeline {
        &self.pipeline
    }

    pub fn tick(&self) -> usize {
        self.tick
    }

    pub fn advance_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn start_game(&mut self) {
        if let Some(level) = self.session.start() {
            self.load_level(level);
        }
    }

    fn load_level(&mut self, level: u8) {
        tracing::info!(level, "loading question");
        let pipeline = Arc::clone(&self.pipeline);
        let epoch = self.tasks.epoch();
        self.tasks.spawn(async move {
            let acquisition = pipeline.acquire(level).await;
            GameEvent::QuestionResolved {
                epoch,
                level,
                acquisition,
            }
        });
    }

    fn retry_load_later(&mut self, level: u8) {
        let pipeline = Arc::clone(&self.pipeline);
        let epoch = self.tasks.epoch();
        let grace = self.pipeline.lock_grace();
        self.tasks.spawn(async move {
            tokio::time::sleep(grace).await;
            let acquisition = pipeline.acquire(level).await;
            GameEvent::QuestionResolved {
                epoch,
                level,
                acquisition,
            }
        });
    }

    pub fn select_next_option(&mut self) {
        self.session.select_next_option();
    }

    pub fn select_previous_option(&mut self) {
        self.session.select_previous_option();
    }

    pub fn lock_highlighted(&mut self) {
        self.lock_option(self.session.cursor());
    }

    pub fn lock_option(&mut self, option: usize) {
        if !self.session.select_option(option) {
            return;
        }
        tracing::debug!(level = self.session.level(), option, "answer locked");
        self.audio.play(AudioCue::Lock);
        self.tasks
            .schedule(REVEAL_DELAY, |epoch| GameEvent::Reveal { epoch });
    }

    pub fn next_question(&mut self) {
        match self.session.advance() {
            Some(Advance::Load(level)) => self.load_level(level),
            Some(Advance::Finished) => {
                tracing::info!(winnings = self.session.winnings(), "all questions answered");
            }
            None => {}
        }
    }

    /// Start a new game: cancels pending work and forgets cached questions.
    pub async fn restart(&mut self) {
        if !self.session.is_game_over() {
            return;
        }
        self.tasks.cancel_all();
        self.audio.stop();
        self.pipeline.reset().await;

        if let Some(level) = self.session.restart() {
            tracing::info!("new game started");
            self.load_level(level);
        }
    }

    pub fn handle_event(&mut self, event: GameEvent) {
        if !self.tasks.is_current(&event) {
            tracing::debug!(?event, "dropping event from a previous game");
            return;
        }

        match event {
            GameEvent::QuestionResolved {
                level, acquisition, ..
            } => match acquisition {
                Acquisition::Ready(resolved) => {
                    if let Some(notice) = &resolved.notice {
                        tracing::warn!(level, notice = %notice, "serving fallback question");
                    }
                    self.session.question_resolved(level, resolved);
                }
                Acquisition::InFlight => {
                    if self.session.phase() == Phase::Loading && self.session.level() == level {
                        self.retry_load_later(level);
                    }
                }
                Acquisition::Complete => {}
            },
            GameEvent::Reveal { .. } => match self.session.reveal() {
                Some(true) => {
                    self.audio.play(AudioCue::Correct);
                    tracing::info!(
                        level = self.session.level(),
                        winnings = self.session.winnings(),
                        "correct answer"
                    );
                }
                Some(false) => {
                    self.audio.play(AudioCue::Wrong);
                    tracing::info!(
                        level = self.session.level(),
                        winnings = self.session.winnings(),
                        "wrong answer"
                    );
                    self.tasks
                        .schedule(GAME_OVER_DELAY, |epoch| GameEvent::GameOver { epoch });
                }
                None => {}
            },
            GameEvent::GameOver { .. } => {
                self.session.end_game();
            }
        }
    }

    /// Stop everything tied to the session; called when the UI goes away.
    pub fn shutdown(&mut self) {
        self.tasks.cancel_all();
        self.audio.stop();
    }
}
