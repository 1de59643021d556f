use serde::{Deserialize, Serialize};

use crate::model::answer::AnswerValue;
use crate::model::ids::QuestionId;

/// Why a session reached the completed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// `next()` was invoked on the last question.
    LastQuestion,
    /// The participant submitted explicitly.
    Submitted,
    /// The configured time limit ran out.
    TimeUp,
}

impl FinishReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FinishReason::LastQuestion => "last_question",
            FinishReason::Submitted => "submitted",
            FinishReason::TimeUp => "time_up",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "last_question" => Some(FinishReason::LastQuestion),
            "submitted" => Some(FinishReason::Submitted),
            "time_up" => Some(FinishReason::TimeUp),
            _ => None,
        }
    }
}

/// Scoring outcome for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub submitted: Option<AnswerValue>,
    pub correct: bool,
    pub points_delta: f64,
}

impl QuestionOutcome {
    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.submitted.is_some()
    }
}

/// Read-only summary of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub score: f64,
    pub breakdown: Vec<QuestionOutcome>,
    pub total_possible: f64,
    pub elapsed_seconds: u64,
    pub finish_reason: FinishReason,
}

impl AttemptResult {
    #[must_use]
    pub fn answered(&self) -> usize {
        self.breakdown.iter().filter(|o| o.is_answered()).count()
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.breakdown.iter().filter(|o| o.correct).count()
    }

    #[must_use]
    pub fn incorrect(&self) -> usize {
        self.breakdown
            .iter()
            .filter(|o| o.is_answered() && !o.correct)
            .count()
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.breakdown.len() - self.answered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, submitted: Option<AnswerValue>, correct: bool, delta: f64) -> QuestionOutcome {
        QuestionOutcome {
            question_id: QuestionId::new(id).unwrap(),
            submitted,
            correct,
            points_delta: delta,
        }
    }

    #[test]
    fn counts_by_outcome() {
        let result = AttemptResult {
            score: 2.0,
            breakdown: vec![
                outcome("q1", Some(AnswerValue::Numerical(1.0)), true, 3.0),
                outcome("q2", Some(AnswerValue::Numerical(2.0)), false, -1.0),
                outcome("q3", None, false, 0.0),
            ],
            total_possible: 9.0,
            elapsed_seconds: 12,
            finish_reason: FinishReason::Submitted,
        };
        assert_eq!(result.answered(), 2);
        assert_eq!(result.correct(), 1);
        assert_eq!(result.incorrect(), 1);
        assert_eq!(result.unanswered(), 1);
    }

    #[test]
    fn finish_reason_round_trips_through_str() {
        for reason in [
            FinishReason::LastQuestion,
            FinishReason::Submitted,
            FinishReason::TimeUp,
        ] {
            assert_eq!(FinishReason::parse(reason.as_str()), Some(reason));
        }
        assert_eq!(FinishReason::parse("bogus"), None);
    }
}
