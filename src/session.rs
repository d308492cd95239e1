//! Game session state machine.
//!
//! Pure state: no timers or I/O live here. The controller in [`crate::app`]
//! schedules the delayed transitions and feeds results back in.

use std::time::Duration;

use crate::data::{MAX_LEVEL, ZERO_PRIZE, prize_after_miss, prize_for, top_prize};
use crate::models::{NUM_OPTIONS, Question};
use crate::pipeline::{Resolved, Source};

/// Pause between locking an answer and revealing it.
pub const REVEAL_DELAY: Duration = Duration::from_secs(3);

/// Pause between revealing a wrong answer and the game-over screen.
pub const GAME_OVER_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Welcome,
    Loading,
    Ready,
    Locked { selected: usize },
    Revealed { selected: usize, correct: bool },
    GameOver,
}

/// What the player should be told alongside the question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banner {
    pub using_cache: bool,
    pub quota_exhausted: bool,
    pub error: Option<String>,
}

/// Result of moving on from a correctly answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Load(u8),
    Finished,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    phase: Phase,
    level: u8,
    question: Option<Question>,
    cursor: usize,
    winnings: &'static str,
    banner: Banner,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Welcome,
            level: 1,
            question: None,
            cursor: 0,
            winnings: ZERO_PRIZE,
            banner: Banner::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn winnings(&self) -> &'static str {
        self.winnings
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn current_prize(&self) -> &'static str {
        prize_for(self.level)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Leave the welcome screen. Returns the level to load.
    pub fn start(&mut self) -> Option<u8> {
        if self.phase != Phase::Welcome {
            return None;
        }
        self.enter_loading(1);
        Some(self.level)
    }

    fn enter_loading(&mut self, level: u8) {
        self.phase = Phase::Loading;
        self.level = level;
        self.question = None;
        self.cursor = 0;
        self.banner.error = None;
    }

    /// Accept a resolved question. Stale results are ignored.
    pub fn question_resolved(&mut self, level: u8, resolved: Resolved) -> bool {
        if self.phase != Phase::Loading || level != self.level {
            return false;
        }

        self.banner = Banner {
            using_cache: resolved.source == Source::Cache,
            quota_exhausted: resolved.quota_exhausted,
            error: resolved.notice,
        };
        self.question = Some(resolved.question);
        self.cursor = 0;
        self.phase = Phase::Ready;
        true
    }

    pub fn select_next_option(&mut self) {
        if self.phase == Phase::Ready {
            self.cursor = (self.cursor + 1) % NUM_OPTIONS;
        }
    }

    pub fn select_previous_option(&mut self) {
        if self.phase == Phase::Ready {
            self.cursor = (self.cursor + NUM_OPTIONS - 1) % NUM_OPTIONS;
        }
    }

    /// Lock in `option`. Only legal while a question is waiting for an answer.
    pub fn select_option(&mut self, option: usize) -> bool {
        if self.phase != Phase::Ready || option >= NUM_OPTIONS {
            return false;
        }
        self.cursor = option;
        self.phase = Phase::Locked { selected: option };
        true
    }

    /// Reveal the locked answer. Returns whether it was correct.
    pub fn reveal(&mut self) -> Option<bool> {
        let Phase::Locked { selected } = self.phase else {
            return None;
        };
        let question = self.question.as_ref()?;
        let correct = question.is_correct(selected);

        self.winnings = if correct {
            prize_for(self.level)
        } else {
            prize_after_miss(self.level)
        };
        self.phase = Phase::Revealed { selected, correct };
        Some(correct)
    }

    /// Finish the game after a wrong answer has been shown.
    pub fn end_game(&mut self) -> bool {
        if !matches!(self.phase, Phase::Revealed { correct: false, .. }) {
            return false;
        }
        self.phase = Phase::GameOver;
        true
    }

    /// Move on from a correct answer.
    pub fn advance(&mut self) -> Option<Advance> {
        if !matches!(self.phase, Phase::Revealed { correct: true, .. }) {
            return None;
        }

        if self.level < MAX_LEVEL {
            self.enter_loading(self.level + 1);
            Some(Advance::Load(self.level))
        } else {
            self.winnings = top_prize();
            self.phase = Phase::GameOver;
            Some(Advance::Finished)
        }
    }

    /// Start over from level 1 after the game has ended.
    pub fn restart(&mut self) -> Option<u8> {
        if self.phase != Phase::GameOver {
            return None;
        }
        *self = Self::new();
        self.enter_loading(1);
        Some(self.level)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FallbackSet;

    fn resolved(level: u8) -> Resolved {
        Resolved {
            question: FallbackSet::builtin().for_level(level).clone(),
            source: Source::Fallback,
            quota_exhausted: false,
            notice: None,
        }
    }

    fn answer(session: &mut GameSession, correct: bool) -> bool {
        let question = session.question().unwrap();
        let right = question.correct_answer();
        let choice = if correct { right } else { (right + 1) % 4 };
        assert!(session.select_option(choice));
        session.reveal().unwrap()
    }

    fn play_to(session: &mut GameSession, level: u8) {
        session.start();
        assert!(session.question_resolved(1, resolved(1)));
        while session.level() < level {
            assert!(answer(session, true));
            let next = session.advance().unwrap();
            let Advance::Load(next) = next else {
                panic!("game ended early");
            };
            assert!(session.question_resolved(next, resolved(next)));
        }
    }

    #[test]
    fn test_new_session_is_at_welcome() {
        let session = GameSession::new();
        assert_eq!(session.phase(), Phase::Welcome);
        assert_eq!(session.level(), 1);
        assert_eq!(session.winnings(), ZERO_PRIZE);
    }

    #[test]
    fn test_wrong_at_level_one_wins_nothing() {
        let mut session = GameSession::new();
        play_to(&mut session, 1);

        assert!(!answer(&mut session, false));
        assert_eq!(session.winnings(), ZERO_PRIZE);
        assert!(session.end_game());
        assert!(session.is_game_over());
    }

    #[test]
    fn test_wrong_at_level_five_keeps_level_four_prize() {
        let mut session = GameSession::new();
        play_to(&mut session, 5);
        assert_eq!(session.winnings(), "₹5,000");

        assert!(!answer(&mut session, false));
        assert_eq!(session.winnings(), prize_for(4));
        assert!(session.advance().is_none());
        assert!(session.end_game());
    }

    #[test]
    fn test_all_fifteen_correct() {
        let mut session = GameSession::new();
        play_to(&mut session, 15);

        assert!(answer(&mut session, true));
        assert_eq!(session.advance(), Some(Advance::Finished));
        assert_eq!(session.winnings(), "₹7 Crores");
        assert!(session.is_game_over());
    }

    #[test]
    fn test_selection_ignored_while_locked_or_revealed() {
        let mut session = GameSession::new();
        play_to(&mut session, 1);

        assert!(session.select_option(2));
        assert!(!session.select_option(1));
        assert_eq!(session.phase(), Phase::Locked { selected: 2 });

        session.reveal();
        assert!(!session.select_option(0));
        assert!(matches!(session.phase(), Phase::Revealed { selected: 2, .. }));
    }

    #[test]
    fn test_select_before_question_loaded() {
        let mut session = GameSession::new();
        session.start();
        assert!(!session.select_option(0));
        assert!(session.reveal().is_none());
    }

    #[test]
    fn test_stale_resolution_is_ignored() {
        let mut session = GameSession::new();
        session.start();
        assert!(!session.question_resolved(2, resolved(2)));
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.question_resolved(1, resolved(1)));
        assert!(!session.question_resolved(1, resolved(1)));
    }

    #[test]
    fn test_cursor_wraps() {
        let mut session = GameSession::new();
        play_to(&mut session, 1);
        session.select_previous_option();
        assert_eq!(session.cursor(), 3);
        session.select_next_option();
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_banner_reflects_source() {
        let mut session = GameSession::new();
        session.start();
        let mut r = resolved(1);
        r.source = Source::Cache;
        r.quota_exhausted = true;
        r.notice = Some("boom".into());
        session.question_resolved(1, r);

        assert_eq!(
            session.banner(),
            &Banner {
                using_cache: true,
                quota_exhausted: true,
                error: Some("boom".into()),
            }
        );
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = GameSession::new();
        play_to(&mut session, 3);
        answer(&mut session, false);
        assert!(session.restart().is_none(), "restart only from game over");
        session.end_game();

        assert_eq!(session.restart(), Some(1));
        assert_eq!(session.phase(), Phase::Loading);
        assert_eq!(session.level(), 1);
        assert_eq!(session.winnings(), ZERO_PRIZE);
        assert!(session.question().is_none());
    }
}
