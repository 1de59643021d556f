use std::collections::HashSet;
use std::fmt;

use quiz_core::model::{
    AnswerMap, AnswerValue, AttemptResult, FinishReason, Question, QuestionId, Quiz,
    SessionSettings,
};
use quiz_core::scoring::{ScoringPolicy, build_result, compute_score};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz session. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor now points at this index.
    Moved(usize),
    /// The request was ignored (out of range, at a boundary, or already completed).
    Stayed,
    /// `next()` on the last question completed the session.
    Finished,
}

/// Outcome of a single timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is not running; nothing changed.
    Ignored,
    /// The elapsed counter advanced.
    Running { elapsed_seconds: u64 },
    /// This tick reached the time limit and completed the session.
    TimeUp,
}

/// Per-question marker used by navigation palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionStatus {
    Current,
    Flagged,
    Answered,
    Visited,
    Unvisited,
}

/// Read-only snapshot of what the participant is looking at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionView<'a> {
    pub current_index: usize,
    pub question: &'a Question,
    pub answer: Option<&'a AnswerValue>,
    pub is_flagged: bool,
    pub elapsed_seconds: u64,
    pub remaining_seconds: Option<u64>,
    pub state: SessionState,
    pub total_questions: usize,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One participant working through one quiz.
///
/// The session is a plain value with a single owner. Every operation is
/// synchronous, never fails, and becomes a no-op once the session is
/// completed, so late timer ticks and repeated submits are harmless.
pub struct QuizSession {
    quiz: Quiz,
    settings: SessionSettings,
    policy: ScoringPolicy,
    state: SessionState,
    current: usize,
    answers: AnswerMap,
    flags: HashSet<QuestionId>,
    visited: Vec<bool>,
    elapsed_seconds: u64,
    result: Option<AttemptResult>,
}

impl QuizSession {
    /// Create a session in the `NotStarted` state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the quiz has no questions.
    pub fn new(quiz: Quiz, settings: SessionSettings) -> Result<Self, SessionError> {
        if quiz.is_empty() {
            return Err(SessionError::Empty);
        }

        let visited = vec![false; quiz.question_count()];
        Ok(Self {
            policy: ScoringPolicy::from(&settings),
            quiz,
            settings,
            state: SessionState::NotStarted,
            current: 0,
            answers: AnswerMap::new(),
            flags: HashSet::new(),
            visited,
            elapsed_seconds: 0,
            result: None,
        })
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.quiz.questions()[self.current]
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, question_id: &QuestionId) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    #[must_use]
    pub fn is_flagged(&self, question_id: &QuestionId) -> bool {
        self.flags.contains(question_id)
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Seconds left before the time limit, or `None` for untimed sessions.
    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u64> {
        self.settings
            .time_limit_seconds()
            .map(|limit| limit.saturating_sub(self.elapsed_seconds))
    }

    /// The frozen result once the session is completed.
    #[must_use]
    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    /// Score of the answers recorded so far.
    #[must_use]
    pub fn score(&self) -> f64 {
        match &self.result {
            Some(result) => result.score,
            None => compute_score(&self.quiz, &self.answers, self.policy),
        }
    }

    /// Enter `InProgress` and mark the first question as visited.
    pub fn start(&mut self) {
        if self.state == SessionState::NotStarted {
            self.state = SessionState::InProgress;
            self.visited[self.current] = true;
            tracing::debug!(quiz_id = %self.quiz.id(), "session started");
        }
    }

    /// Record (or replace) the answer for a question.
    ///
    /// Returns `false` when the answer was ignored: unknown question or a
    /// completed session.
    pub fn select_answer(&mut self, question_id: &QuestionId, value: AnswerValue) -> bool {
        if self.is_complete() || self.quiz.find(question_id).is_none() {
            return false;
        }
        self.start();
        tracing::trace!(question_id = %question_id, answer = %value, "answer selected");
        self.answers.insert(question_id.clone(), value);
        true
    }

    /// Flip the review flag of a question. Returns the new flag state.
    pub fn toggle_flag(&mut self, question_id: &QuestionId) -> bool {
        if self.is_complete() || self.quiz.find(question_id).is_none() {
            return self.is_flagged(question_id);
        }
        self.start();
        if self.flags.remove(question_id) {
            false
        } else {
            self.flags.insert(question_id.clone());
            true
        }
    }

    /// Jump to `index`. Out-of-range targets are ignored.
    pub fn go_to(&mut self, index: usize) -> Navigation {
        if self.is_complete() || index >= self.quiz.question_count() {
            return Navigation::Stayed;
        }
        self.start();
        self.current = index;
        self.visited[index] = true;
        Navigation::Moved(index)
    }

    /// Advance one question; on the last question this completes the session.
    pub fn next(&mut self) -> Navigation {
        if self.is_complete() {
            return Navigation::Stayed;
        }
        if self.current + 1 >= self.quiz.question_count() {
            self.start();
            self.complete(FinishReason::LastQuestion);
            return Navigation::Finished;
        }
        self.go_to(self.current + 1)
    }

    /// Step back one question. Ignored on the first question.
    pub fn previous(&mut self) -> Navigation {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => Navigation::Stayed,
        }
    }

    /// Advance the elapsed counter by one second.
    ///
    /// Reaching the configured limit completes the session with
    /// `FinishReason::TimeUp`; any later tick is ignored.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != SessionState::InProgress {
            return TickOutcome::Ignored;
        }

        self.elapsed_seconds += 1;
        match self.settings.time_limit_seconds() {
            Some(limit) if self.elapsed_seconds >= limit => {
                self.complete(FinishReason::TimeUp);
                TickOutcome::TimeUp
            }
            _ => TickOutcome::Running {
                elapsed_seconds: self.elapsed_seconds,
            },
        }
    }

    /// Submit the session. Idempotent: later calls return the first result.
    pub fn finalize(&mut self) -> &AttemptResult {
        self.complete(FinishReason::Submitted)
    }

    fn complete(&mut self, reason: FinishReason) -> &AttemptResult {
        let Self {
            quiz,
            answers,
            policy,
            elapsed_seconds,
            state,
            result,
            ..
        } = self;

        result.get_or_insert_with(|| {
            *state = SessionState::Completed;
            let result = build_result(quiz, answers, *policy, *elapsed_seconds, reason);
            tracing::debug!(
                quiz_id = %quiz.id(),
                reason = reason.as_str(),
                score = result.score,
                "session completed"
            );
            result
        })
    }

    /// Status of every question, in quiz order.
    #[must_use]
    pub fn question_statuses(&self) -> Vec<QuestionStatus> {
        self.quiz
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                if index == self.current {
                    QuestionStatus::Current
                } else if self.flags.contains(question.id()) {
                    QuestionStatus::Flagged
                } else if self.answers.contains_key(question.id()) {
                    QuestionStatus::Answered
                } else if self.visited[index] {
                    QuestionStatus::Visited
                } else {
                    QuestionStatus::Unvisited
                }
            })
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.quiz.question_count();
        let answered = self.answers.len();
        SessionProgress {
            total,
            answered,
            flagged: self.flags.len(),
            remaining_unanswered: total.saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn view(&self) -> SessionView<'_> {
        let question = self.current_question();
        SessionView {
            current_index: self.current,
            question,
            answer: self.answers.get(question.id()),
            is_flagged: self.flags.contains(question.id()),
            elapsed_seconds: self.elapsed_seconds,
            remaining_seconds: self.remaining_seconds(),
            state: self.state,
            total_questions: self.quiz.question_count(),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", self.quiz.id())
            .field("questions", &self.quiz.question_count())
            .field("state", &self.state)
            .field("current", &self.current)
            .field("answers", &self.answers.len())
            .field("flags", &self.flags.len())
            .field("elapsed_seconds", &self.elapsed_seconds)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
