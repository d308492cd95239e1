use std::fmt::Write as _;

/// Difficulty band a level falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyTier {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl DifficultyTier {
    pub fn for_level(level: u8) -> Self {
        match level {
            0..=3 => Self::VeryEasy,
            4..=6 => Self::Easy,
            7..=9 => Self::Medium,
            10..=12 => Self::Hard,
            _ => Self::VeryHard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryEasy => "बहुत आसान (very easy)",
            Self::Easy => "आसान (easy)",
            Self::Medium => "मध्यम (medium)",
            Self::Hard => "कठिन (hard)",
            Self::VeryHard => "बहुत कठिन (extremely hard)",
        }
    }

    fn guidance(self) -> &'static str {
        match self {
            Self::VeryEasy => "very easy, answerable by a school child",
            Self::Easy => "easy, common general knowledge",
            Self::Medium => "medium, needs some reading beyond the basics",
            Self::Hard => "hard, the correct answer must not be obvious",
            Self::VeryHard => "extremely obscure, requiring deep specialist knowledge",
        }
    }
}

const TOPICS: [&str; 10] = [
    "Indian history",
    "world geography",
    "science and nature",
    "sports",
    "Indian cinema and music",
    "literature and languages",
    "mythology and culture",
    "technology and inventions",
    "politics and constitution",
    "economy and business",
];

/// Topic for a level, rotating through the list so consecutive levels differ.
pub fn topic_for_level(level: u8) -> &'static str {
    TOPICS[(level as usize).saturating_sub(1) % TOPICS.len()]
}

pub fn build_prompt(level: u8, history: &[String]) -> String {
    let tier = DifficultyTier::for_level(level);
    let mut prompt = format!(
        "You are generating a question for a \"Kaun Banega Crorepati\" (KBC) style quiz game.\n\n\
         Level: {level} of 15 ({label})\n\
         Topic: {topic}\n\n\
         Requirements:\n\
         1. The question text MUST be in Hindi (Devanagari script). English terms are fine for proper nouns and technical words.\n\
         2. Difficulty: {guidance}.\n\
         3. Write it in the style of the KBC quiz show.\n\
         4. Provide exactly 4 options.\n\
         5. Exactly one option is correct.\n",
        label = tier.label(),
        topic = topic_for_level(level),
        guidance = tier.guidance(),
    );

    if !history.is_empty() {
        prompt.push_str("\nDo NOT ask any of these questions again, or a close variant of them:\n");
        for asked in history {
            let _ = writeln!(prompt, "- {}", asked);
        }
    }

    prompt.push_str(
        "\nReturn ONLY a JSON object in exactly this format (no markdown, no explanations):\n\
         {\n  \
           \"question\": \"question text in Hindi\",\n  \
           \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],\n  \
           \"answer\": \"the exact text of the correct option\",\n  \
           \"translation\": \"English translation of the question\"\n\
         }\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        assert_eq!(DifficultyTier::for_level(1), DifficultyTier::VeryEasy);
        assert_eq!(DifficultyTier::for_level(3), DifficultyTier::VeryEasy);
        assert_eq!(DifficultyTier::for_level(4), DifficultyTier::Easy);
        assert_eq!(DifficultyTier::for_level(9), DifficultyTier::Medium);
        assert_eq!(DifficultyTier::for_level(12), DifficultyTier::Hard);
        assert_eq!(DifficultyTier::for_level(13), DifficultyTier::VeryHard);
        assert_eq!(DifficultyTier::for_level(15), DifficultyTier::VeryHard);
    }

    #[test]
    fn test_topics_rotate() {
        assert_ne!(topic_for_level(1), topic_for_level(2));
        assert_eq!(topic_for_level(1), topic_for_level(11));
    }

    #[test]
    fn test_prompt_lists_history() {
        let history = vec!["पहला प्रश्न?".to_string(), "दूसरा प्रश्न?".to_string()];
        let prompt = build_prompt(7, &history);

        assert!(prompt.contains("Level: 7 of 15"));
        assert!(prompt.contains("मध्यम"));
        assert!(prompt.contains("- पहला प्रश्न?"));
        assert!(prompt.contains("- दूसरा प्रश्न?"));
    }

    #[test]
    fn test_prompt_without_history() {
        let prompt = build_prompt(1, &[]);
        assert!(!prompt.contains("Do NOT ask"));
        assert!(prompt.contains("\"answer\""));
    }
}
