use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of answer options every question carries.
pub const NUM_OPTIONS: usize = 4;

/// Errors raised when a question violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("correct answer index {0} is out of range (expected 0-3)")]
    AnswerOutOfRange(usize),
    #[error("question text is empty")]
    EmptyText,
}

/// A single multiple-choice question bound to a ladder level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    id: u8,
    text: String,
    options: [String; NUM_OPTIONS],
    correct_answer: usize,
    translation: Option<String>,
}

impl Question {
    pub fn new(
        id: u8,
        text: impl Into<String>,
        options: [String; NUM_OPTIONS],
        correct_answer: usize,
        translation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if correct_answer >= NUM_OPTIONS {
            return Err(QuestionError::AnswerOutOfRange(correct_answer));
        }
        let translation = translation.filter(|t| !t.trim().is_empty());

        Ok(Self {
            id,
            text,
            options,
            correct_answer,
            translation,
        })
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String; NUM_OPTIONS] {
        &self.options
    }

    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer
    }

    /// Same question re-tagged with another level id.
    pub fn with_id(mut self, id: u8) -> Self {
        self.id = id;
        self
    }
}

/// Wire shape of a question, as stored in the cache and fallback files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    #[serde(default)]
    id: u8,
    question: String,
    options: [String; NUM_OPTIONS],
    correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    translation: Option<String>,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::new(
            record.id,
            record.question,
            record.options,
            record.correct_answer,
            record.translation,
        )
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question: question.text,
            options: question.options,
            correct_answer: question.correct_answer,
            translation: question.translation,
        }
    }
}
