//! Remote question generation.

mod gemini;
mod parse;
mod prompt;

pub use gemini::{GeminiConfig, GeminiProvider};
pub use parse::{extract_json_object, parse_question_reply};
pub use prompt::{DifficultyTier, build_prompt, topic_for_level};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Question;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("question API is not configured: {0}")]
    Configuration(String),
    #[error("question API quota exhausted")]
    RateLimited { retry_after_secs: Option<u64> },
    #[error("question API returned an unusable reply: {0}")]
    MalformedResponse(String),
    #[error("question API request failed: {0}")]
    Network(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}

#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Generate a question for `level` that does not repeat any text in
    /// `history`.
    async fn fetch(&self, level: u8, history: &[String]) -> Result<Question, ProviderError>;
}

/// Provider used when no API key is available; every fetch falls back.
#[derive(Debug, Clone, Default)]
pub struct OfflineProvider;

#[async_trait]
impl QuestionProvider for OfflineProvider {
    async fn fetch(&self, _level: u8, _history: &[String]) -> Result<Question, ProviderError> {
        Err(ProviderError::Configuration(
            "no API key set (GEMINI_API_KEY)".to_string(),
        ))
    }
}
