use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::model::{Attempt, FinishReason, QuizId};
use storage::repository::{AttemptId, AttemptRepository, AttemptRow};

use crate::error::AttemptHistoryError;

/// Presentation-agnostic list item for a finished attempt.
///
/// No pre-formatted strings; the caller formats scores and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptListItem {
    pub id: AttemptId,
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub completed_at: DateTime<Utc>,

    pub score: f64,
    pub total_possible: f64,
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub elapsed_seconds: u64,
    pub finish_reason: FinishReason,
}

impl AttemptListItem {
    #[must_use]
    pub fn from_row(row: &AttemptRow) -> Self {
        Self::from_attempt(row.id, &row.attempt)
    }

    #[must_use]
    pub fn from_attempt(id: AttemptId, attempt: &Attempt) -> Self {
        let result = attempt.result();
        Self {
            id,
            quiz_id: attempt.quiz_id().clone(),
            quiz_title: attempt.quiz_title().to_owned(),
            completed_at: attempt.completed_at(),
            score: result.score,
            total_possible: result.total_possible,
            correct: result.correct(),
            incorrect: result.incorrect(),
            unanswered: result.unanswered(),
            elapsed_seconds: result.elapsed_seconds,
            finish_reason: result.finish_reason,
        }
    }
}

/// Read-side facade over stored attempts.
#[derive(Clone)]
pub struct AttemptHistoryService {
    attempts: Arc<dyn AttemptRepository>,
}

impl AttemptHistoryService {
    #[must_use]
    pub fn new(attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { attempts }
    }

    /// Newest attempts first, optionally for one quiz.
    ///
    /// # Errors
    ///
    /// Returns `AttemptHistoryError::Storage` on repository failures.
    pub async fn list(
        &self,
        quiz_id: Option<&QuizId>,
        limit: u32,
    ) -> Result<Vec<AttemptListItem>, AttemptHistoryError> {
        let rows = self.attempts.list_attempts(quiz_id, limit).await?;
        Ok(rows.iter().map(AttemptListItem::from_row).collect())
    }

    /// Fetch a full attempt including its per-question breakdown.
    ///
    /// # Errors
    ///
    /// Returns `AttemptHistoryError::Storage` (`NotFound` when missing).
    pub async fn get(&self, id: AttemptId) -> Result<Attempt, AttemptHistoryError> {
        Ok(self.attempts.get_attempt(id).await?)
    }
}
