//! Pure scoring over a quiz definition and an answer map.

use crate::model::{
    AnswerMap, AnswerValue, AttemptResult, FinishReason, Question, QuestionKind, QuestionOutcome,
    Quiz, SessionSettings,
};

//
// ─── POLICY ────────────────────────────────────────────────────────────────────
//

/// Scoring policy applied uniformly to every question of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoringPolicy {
    /// When false, incorrect answers contribute zero instead of a deduction.
    pub negative_marking: bool,
}

impl ScoringPolicy {
    #[must_use]
    pub fn new(negative_marking: bool) -> Self {
        Self { negative_marking }
    }
}

impl From<&SessionSettings> for ScoringPolicy {
    fn from(settings: &SessionSettings) -> Self {
        Self::new(settings.negative_marking())
    }
}

//
// ─── CORRECTNESS ───────────────────────────────────────────────────────────────
//

/// Compare a submitted value against the question's correctness rule.
///
/// A value whose variant does not match the question is never correct.
///
/// ```
/// # use quiz_core::model::{AnswerValue, Question, QuestionId};
/// # use quiz_core::scoring::is_correct;
/// let q = Question::numerical(
///     QuestionId::new("q").unwrap(), "Maths", "Five?", 3.0, 2.0, 5.0, Some(0.5),
/// ).unwrap();
/// assert!(is_correct(&q, &AnswerValue::Numerical(5.4)));
/// assert!(!is_correct(&q, &AnswerValue::Numerical(5.6)));
/// ```
#[must_use]
pub fn is_correct(question: &Question, answer: &AnswerValue) -> bool {
    match (question.kind(), answer) {
        (QuestionKind::Choice { correct_option, .. }, AnswerValue::Choice(submitted)) => {
            submitted == correct_option
        }
        (
            QuestionKind::Numerical {
                correct_answer,
                tolerance,
            },
            AnswerValue::Numerical(submitted),
        ) => match tolerance {
            Some(tol) => (submitted - correct_answer).abs() <= *tol,
            #[allow(clippy::float_cmp)]
            None => submitted == correct_answer,
        },
        (QuestionKind::Choice { .. }, AnswerValue::Numerical(_))
        | (QuestionKind::Numerical { .. }, AnswerValue::Choice(_)) => false,
    }
}

/// Score one question. Unanswered questions contribute zero and are not correct.
#[must_use]
pub fn score_question(
    question: &Question,
    answer: Option<&AnswerValue>,
    policy: ScoringPolicy,
) -> QuestionOutcome {
    let (correct, points_delta) = match answer {
        None => (false, 0.0),
        Some(value) if is_correct(question, value) => (true, question.points_correct()),
        Some(_) if policy.negative_marking => (false, -question.points_incorrect()),
        Some(_) => (false, 0.0),
    };

    QuestionOutcome {
        question_id: question.id().clone(),
        submitted: answer.cloned(),
        correct,
        points_delta,
    }
}

/// Total score over all questions. Not clamped; may be negative.
#[must_use]
pub fn compute_score(quiz: &Quiz, answers: &AnswerMap, policy: ScoringPolicy) -> f64 {
    quiz.questions()
        .iter()
        .map(|question| score_question(question, answers.get(question.id()), policy).points_delta)
        .sum()
}

/// Build the read-only result for a completed session.
#[must_use]
pub fn build_result(
    quiz: &Quiz,
    answers: &AnswerMap,
    policy: ScoringPolicy,
    elapsed_seconds: u64,
    finish_reason: FinishReason,
) -> AttemptResult {
    let breakdown: Vec<QuestionOutcome> = quiz
        .questions()
        .iter()
        .map(|question| score_question(question, answers.get(question.id()), policy))
        .collect();
    let score = breakdown.iter().map(|o| o.points_delta).sum();

    AttemptResult {
        score,
        breakdown,
        total_possible: quiz.total_possible(),
        elapsed_seconds,
        finish_reason,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OptionId, QuestionId, QuestionOption, QuizId};

    fn oid(id: &str) -> OptionId {
        OptionId::new(id).unwrap()
    }

    fn choice(id: &str, correct: &str, points_correct: f64, points_incorrect: f64) -> Question {
        let options = ["a", "b", "c", "d"]
            .into_iter()
            .map(|o| QuestionOption {
                id: oid(o),
                text: o.to_uppercase(),
            })
            .collect();
        Question::choice(
            QuestionId::new(id).unwrap(),
            "General",
            "Pick one",
            points_correct,
            points_incorrect,
            options,
            oid(correct),
        )
        .unwrap()
    }

    fn numerical(id: &str, answer: f64, tolerance: Option<f64>, pc: f64, pi: f64) -> Question {
        Question::numerical(
            QuestionId::new(id).unwrap(),
            "Maths",
            "Compute",
            pc,
            pi,
            answer,
            tolerance,
        )
        .unwrap()
    }

    fn two_question_quiz() -> Quiz {
        Quiz::new(
            QuizId::new("e2e").unwrap(),
            "End to end",
            None,
            None,
            vec![
                choice("Q1", "a", 4.0, 1.0),
                numerical("Q2", 5.0, None, 3.0, 2.0),
            ],
        )
        .unwrap()
    }

    fn answers(pairs: &[(&str, AnswerValue)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(id, v)| (QuestionId::new(*id).unwrap(), v.clone()))
            .collect()
    }

    #[test]
    fn tolerance_boundary() {
        let q = numerical("n", 5.0, Some(0.5), 1.0, 1.0);
        assert!(is_correct(&q, &AnswerValue::Numerical(5.4)));
        assert!(is_correct(&q, &AnswerValue::Numerical(4.5)));
        assert!(!is_correct(&q, &AnswerValue::Numerical(5.6)));
    }

    #[test]
    fn exact_equality_without_tolerance() {
        let q = numerical("n", 5.0, None, 1.0, 1.0);
        assert!(is_correct(&q, &AnswerValue::Numerical(5.0)));
        assert!(!is_correct(&q, &AnswerValue::Numerical(5.000_001)));
    }

    #[test]
    fn choice_awards_or_deducts() {
        let q = choice("c1", "c", 4.0, 1.0);
        let on = ScoringPolicy::new(true);
        let off = ScoringPolicy::new(false);

        let right = AnswerValue::Choice(oid("c"));
        let wrong = AnswerValue::Choice(oid("a"));

        assert_eq!(score_question(&q, Some(&right), on).points_delta, 4.0);
        assert_eq!(score_question(&q, Some(&wrong), on).points_delta, -1.0);
        assert_eq!(score_question(&q, Some(&wrong), off).points_delta, 0.0);
        assert!(!score_question(&q, Some(&wrong), off).correct);
    }

    #[test]
    fn unanswered_contributes_zero() {
        let q = choice("c1", "c", 4.0, 1.0);
        let outcome = score_question(&q, None, ScoringPolicy::new(true));
        assert_eq!(outcome.points_delta, 0.0);
        assert!(!outcome.correct);
        assert!(outcome.submitted.is_none());
    }

    #[test]
    fn mismatched_variant_is_incorrect() {
        let q = choice("c1", "c", 4.0, 1.0);
        let outcome = score_question(&q, Some(&AnswerValue::Numerical(3.0)), ScoringPolicy::new(true));
        assert!(!outcome.correct);
        assert_eq!(outcome.points_delta, -1.0);
    }

    #[test]
    fn end_to_end_scenario() {
        let quiz = two_question_quiz();
        let answers = answers(&[
            ("Q1", AnswerValue::Choice(oid("b"))),
            ("Q2", AnswerValue::Numerical(5.0)),
        ]);

        assert_eq!(compute_score(&quiz, &answers, ScoringPolicy::new(true)), 2.0);
        assert_eq!(compute_score(&quiz, &answers, ScoringPolicy::new(false)), 3.0);
    }

    #[test]
    fn score_can_go_negative() {
        let quiz = two_question_quiz();
        let answers = answers(&[
            ("Q1", AnswerValue::Choice(oid("d"))),
            ("Q2", AnswerValue::Numerical(1.0)),
        ]);
        assert_eq!(compute_score(&quiz, &answers, ScoringPolicy::new(true)), -3.0);
    }

    #[test]
    fn result_breakdown_follows_question_order() {
        let quiz = two_question_quiz();
        let answers = answers(&[("Q2", AnswerValue::Numerical(5.0))]);
        let result = build_result(
            &quiz,
            &answers,
            ScoringPolicy::new(true),
            42,
            FinishReason::Submitted,
        );

        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.breakdown[0].question_id.as_str(), "Q1");
        assert!(result.breakdown[0].submitted.is_none());
        assert!(result.breakdown[1].correct);
        assert_eq!(result.score, 3.0);
        assert_eq!(result.total_possible, 7.0);
        assert_eq!(result.elapsed_seconds, 42);
    }

    #[test]
    fn policy_from_settings() {
        let settings = SessionSettings::new(None, true);
        assert!(ScoringPolicy::from(&settings).negative_marking);
    }
}
