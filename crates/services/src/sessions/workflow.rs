use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::model::{
    AnswerError, AnswerValue, Attempt, QuestionId, QuizId, SessionSettings,
};
use storage::repository::{AttemptId, AttemptRepository, QuizRepository};

use super::service::QuizSession;
use crate::Clock;
use crate::error::SessionError;

/// A persisted attempt and its storage id.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome {
    pub attempt_id: AttemptId,
    pub attempt: Attempt,
}

/// A running session together with its wall-clock bookkeeping.
#[derive(Debug)]
pub struct ActiveSession {
    session: QuizSession,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    outcome: Option<AttemptOutcome>,
}

impl ActiveSession {
    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Direct access for navigation, flags and ticks.
    pub fn session_mut(&mut self) -> &mut QuizSession {
        &mut self.session
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// The persisted attempt, once `finish` has succeeded.
    #[must_use]
    pub fn outcome(&self) -> Option<&AttemptOutcome> {
        self.outcome.as_ref()
    }
}

/// Orchestrates session start, validated answering and persist-once finishing.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            attempts,
        }
    }

    /// Load a quiz and start a session on it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuizNotFound` if the quiz does not exist,
    /// `SessionError::Empty` if it has no questions, or storage errors.
    pub async fn start_session(
        &self,
        quiz_id: &QuizId,
        settings: SessionSettings,
    ) -> Result<ActiveSession, SessionError> {
        let quiz = self
            .quizzes
            .get_quiz(quiz_id)
            .await?
            .ok_or_else(|| SessionError::QuizNotFound(quiz_id.clone()))?;

        let mut session = QuizSession::new(quiz, settings)?;
        session.start();
        tracing::info!(
            quiz_id = %quiz_id,
            questions = session.quiz().question_count(),
            time_limit_minutes = ?settings.time_limit_minutes(),
            negative_marking = settings.negative_marking(),
            "session started"
        );

        Ok(ActiveSession {
            session,
            started_at: self.clock.now(),
            completed_at: None,
            outcome: None,
        })
    }

    /// Record an answer after checking it against the question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed`, `SessionError::UnknownQuestion`,
    /// `SessionError::AnswerMismatch`, or `SessionError::Answer` for a choice
    /// that names an option the question does not have.
    pub fn answer(
        &self,
        active: &mut ActiveSession,
        question_id: &QuestionId,
        value: AnswerValue,
    ) -> Result<(), SessionError> {
        if active.is_complete() {
            return Err(SessionError::Completed);
        }
        let (_, question) = active
            .session
            .quiz()
            .find(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.clone()))?;

        if !value.matches(question) {
            return Err(SessionError::AnswerMismatch {
                question_id: question_id.clone(),
                expected: question.kind().label(),
            });
        }
        match &value {
            AnswerValue::Choice(option) if !question.options().iter().any(|o| &o.id == option) => {
                return Err(AnswerError::UnknownOption(option.clone()).into());
            }
            _ => {}
        }

        tracing::debug!(question_id = %question_id, answer = %value, "answer recorded");
        active.session.select_answer(question_id, value);
        Ok(())
    }

    /// Parse raw user text for the question's variant and record it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::answer`], plus `SessionError::Answer` for unparsable input.
    pub fn answer_raw(
        &self,
        active: &mut ActiveSession,
        question_id: &QuestionId,
        raw: &str,
    ) -> Result<(), SessionError> {
        if active.is_complete() {
            return Err(SessionError::Completed);
        }
        let (_, question) = active
            .session
            .quiz()
            .find(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.clone()))?;
        let value = AnswerValue::parse_for(question, raw)?;
        self.answer(active, question_id, value)
    }

    /// Complete the session (if still running) and persist the attempt.
    ///
    /// Persists at most once; later calls return the stored outcome. A failed
    /// append can be retried.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if persistence fails.
    pub async fn finish(&self, active: &mut ActiveSession) -> Result<AttemptOutcome, SessionError> {
        if let Some(outcome) = &active.outcome {
            return Ok(outcome.clone());
        }

        let result = active.session.finalize().clone();
        let completed_at = *active.completed_at.get_or_insert_with(|| self.clock.now());
        let quiz = active.session.quiz();
        let attempt = Attempt::new(
            quiz.id().clone(),
            quiz.title(),
            active.started_at,
            completed_at,
            active.session.settings(),
            result,
        )?;

        let attempt_id = self.attempts.append_attempt(&attempt).await?;
        tracing::info!(
            attempt_id,
            quiz_id = %attempt.quiz_id(),
            score = attempt.score(),
            reason = attempt.result().finish_reason.as_str(),
            "attempt persisted"
        );

        let outcome = AttemptOutcome {
            attempt_id,
            attempt,
        };
        active.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Leave the session without saving anything.
    pub fn abandon(&self, active: ActiveSession) {
        tracing::info!(
            quiz_id = %active.session.quiz().id(),
            answered = active.session.answers().len(),
            "session abandoned"
        );
    }
}
