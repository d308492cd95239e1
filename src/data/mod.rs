pub mod game_data;
mod loader;

pub use game_data::{
    MAX_LEVEL, PRIZE_LADDER, ZERO_PRIZE, prize_after_miss, prize_for, top_prize,
};
pub use loader::{LoadError, load_fallback_from_json};

use crate::models::Question;

/// Non-empty list of questions served when remote generation is unavailable.
#[derive(Debug, Clone)]
pub struct FallbackSet {
    questions: Vec<Question>,
}

impl FallbackSet {
    pub fn new(questions: Vec<Question>) -> Result<Self, LoadError> {
        if questions.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(Self { questions })
    }

    pub fn builtin() -> Self {
        Self {
            questions: game_data::builtin_fallback_questions(),
        }
    }

    /// Question for `level`, indexed by `level - 1` and clamped to the first
    /// entry when the list is shorter than the ladder.
    pub fn for_level(&self, level: u8) -> &Question {
        let index = (level as usize).saturating_sub(1);
        self.questions.get(index).unwrap_or(&self.questions[0])
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for FallbackSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_level() {
        let set = FallbackSet::builtin();
        for level in 1..=MAX_LEVEL {
            assert_eq!(set.for_level(level).id(), level);
        }
    }

    #[test]
    fn test_out_of_range_levels_clamp_to_first() {
        let set = FallbackSet::builtin();
        assert_eq!(set.for_level(0).id(), 1);
        assert_eq!(set.for_level(40).id(), 1);
    }

    #[test]
    fn test_empty_set_is_rejected() {
        assert!(matches!(FallbackSet::new(Vec::new()), Err(LoadError::Empty)));
    }
}
