//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AnswerError, AttemptError, QuestionId, QuizError, QuizId};
use storage::catalog::CatalogError;
use storage::repository::StorageError;

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz has no questions")]
    Empty,
    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(QuestionId),
    #[error("question {question_id} expects a {expected} answer")]
    AnswerMismatch {
        question_id: QuestionId,
        expected: &'static str,
    },
    #[error("session already completed")]
    Completed,
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("quiz {0} not found")]
    NotFound(QuizId),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AttemptHistoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptHistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
