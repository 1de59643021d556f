use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::result::AttemptResult;
use crate::model::settings::SessionSettings;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,
}

/// A finished attempt ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    quiz_id: QuizId,
    quiz_title: String,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    settings: SessionSettings,
    result: AttemptResult,
}

impl Attempt {
    /// Build an attempt from a finished session.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::InvalidTimeRange` if `completed_at` is before `started_at`.
    pub fn new(
        quiz_id: QuizId,
        quiz_title: impl Into<String>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        settings: SessionSettings,
        result: AttemptResult,
    ) -> Result<Self, AttemptError> {
        if completed_at < started_at {
            return Err(AttemptError::InvalidTimeRange);
        }

        Ok(Self {
            quiz_id,
            quiz_title: quiz_title.into(),
            started_at,
            completed_at,
            settings,
            result,
        })
    }

    /// Rehydrate an attempt from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::InvalidTimeRange` if the stored range is inverted.
    pub fn from_persisted(
        quiz_id: QuizId,
        quiz_title: String,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        settings: SessionSettings,
        result: AttemptResult,
    ) -> Result<Self, AttemptError> {
        Self::new(quiz_id, quiz_title, started_at, completed_at, settings, result)
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn quiz_title(&self) -> &str {
        &self.quiz_title
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    #[must_use]
    pub fn result(&self) -> &AttemptResult {
        &self.result
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.result.score
    }
}
