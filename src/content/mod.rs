mod offline;
#[cfg(test)]
pub(crate) mod testing;

use crate::errors::ContentError;
use async_trait::async_trait;
use log::warn;
use schema::{Position, Subject};
use serde::{Deserialize, Serialize};

pub use offline::OfflineContentProvider;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    pub const OPTION_COUNT: usize = 4;

    /// Shown whenever no usable question could be fetched.
    pub fn fallback(subject: Subject) -> Self {
        Self {
            question: format!("What is the essence of {}?", subject),
            options: ["Knowledge", "Magic", "Power", "Luck"]
                .into_iter()
                .map(String::from)
                .collect(),
            correct_index: 0,
            explanation: "Knowledge is the key to this game.".to_string(),
        }
    }

    /// Exactly four options with the answer among them.
    pub fn validate(self) -> Result<Self, ContentError> {
        if self.options.len() != Self::OPTION_COUNT {
            return Err(ContentError::Malformed(format!(
                "expected {} options, got {}",
                Self::OPTION_COUNT,
                self.options.len()
            )));
        }
        if self.correct_index >= self.options.len() {
            return Err(ContentError::Malformed(format!(
                "correct index {} out of range",
                self.correct_index
            )));
        }
        Ok(self)
    }

    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_index
    }
}

/// Grade a question should target for a creature or party level.
pub fn grade_level(level: u32) -> u32 {
    (level / 5 + 2).clamp(2, 12)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRequest {
    pub zone_number: u32,
    pub theme: String,
    pub width: usize,
    pub height: usize,
    pub exits: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceRequest {
    pub location: String,
    pub has_starter: bool,
    pub badge_count: usize,
    pub last_action: String,
}

pub const ADVICE_FALLBACK: &str = "My sensors are fuzzy, but I believe in you!";

/// Asynchronous source of quiz questions, generated zones and companion
/// hints. Every call may fail; callers degrade to a fallback.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn request_quiz_question(
        &self,
        subject: Subject,
        level: u32,
    ) -> Result<QuizQuestion, ContentError>;

    /// One question per subject, in order. Failed requests are dropped, so
    /// the batch may come back short or empty.
    async fn request_quiz_batch(
        &self,
        subjects: &[Subject],
        level: u32,
    ) -> Result<Vec<QuizQuestion>, ContentError> {
        let mut batch = Vec::with_capacity(subjects.len());
        for subject in subjects {
            match self.request_quiz_question(*subject, level).await {
                Ok(question) => batch.push(question),
                Err(err) => warn!("Dropping {} question from batch: {}", subject, err),
            }
        }
        Ok(batch)
    }

    async fn request_generated_map(
        &self,
        request: &MapRequest,
    ) -> Result<Vec<Vec<u16>>, ContentError>;

    async fn request_companion_advice(
        &self,
        _request: &AdviceRequest,
    ) -> Result<String, ContentError> {
        Err(ContentError::Unavailable)
    }
}

/// Stand-in for a provider that could not be configured. Every request
/// fails, which exercises all fallback paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableContentProvider;

#[async_trait]
impl ContentProvider for UnavailableContentProvider {
    async fn request_quiz_question(
        &self,
        _subject: Subject,
        _level: u32,
    ) -> Result<QuizQuestion, ContentError> {
        Err(ContentError::Unavailable)
    }

    async fn request_generated_map(
        &self,
        _request: &MapRequest,
    ) -> Result<Vec<Vec<u16>>, ContentError> {
        Err(ContentError::Unavailable)
    }
}
