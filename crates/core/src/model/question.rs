use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{IdError, OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error(transparent)]
    Id(#[from] IdError),

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question subject cannot be empty")]
    EmptySubject,

    #[error("points for a correct answer must be finite and > 0 (got {0})")]
    InvalidPointsCorrect(f64),

    #[error("points for an incorrect answer must be finite and >= 0 (got {0})")]
    InvalidPointsIncorrect(f64),

    #[error("a choice question needs at least two options (got {len})")]
    TooFewOptions { len: usize },

    #[error("duplicate option id: {0}")]
    DuplicateOption(OptionId),

    #[error("option {0} has empty text")]
    EmptyOptionText(OptionId),

    #[error("correct option {0} is not one of the options")]
    UnknownCorrectOption(OptionId),

    #[error("numerical correct answer must be finite")]
    InvalidCorrectAnswer,

    #[error("tolerance must be finite and > 0 (got {0})")]
    InvalidTolerance(f64),
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: OptionId,
    pub text: String,
}

/// Correctness rule of a question.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Pick exactly one of the options.
    Choice {
        options: Vec<QuestionOption>,
        correct_option: OptionId,
    },
    /// Enter a number; correct within `± tolerance`, or exactly when absent.
    Numerical {
        correct_answer: f64,
        tolerance: Option<f64>,
    },
}

impl QuestionKind {
    /// Short label matching the serialized `type` tag.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Choice { .. } => "mcq",
            QuestionKind::Numerical { .. } => "numerical",
        }
    }
}

/// A validated question. Construct through [`Question::choice`],
/// [`Question::numerical`] or [`QuestionDraft::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: QuestionId,
    subject: String,
    text: String,
    points_correct: f64,
    points_incorrect: f64,
    kind: QuestionKind,
    explanation: Option<String>,
}

impl Question {
    /// Build a choice question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text, points or options are invalid.
    pub fn choice(
        id: QuestionId,
        subject: impl Into<String>,
        text: impl Into<String>,
        points_correct: f64,
        points_incorrect: f64,
        options: Vec<QuestionOption>,
        correct_option: OptionId,
    ) -> Result<Self, QuestionError> {
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        for (i, option) in options.iter().enumerate() {
            if option.text.trim().is_empty() {
                return Err(QuestionError::EmptyOptionText(option.id.clone()));
            }
            if options[..i].iter().any(|prev| prev.id == option.id) {
                return Err(QuestionError::DuplicateOption(option.id.clone()));
            }
        }
        if !options.iter().any(|option| option.id == correct_option) {
            return Err(QuestionError::UnknownCorrectOption(correct_option));
        }

        Self::build(
            id,
            subject.into(),
            text.into(),
            points_correct,
            points_incorrect,
            QuestionKind::Choice {
                options,
                correct_option,
            },
        )
    }

    /// Build a numerical question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text, points, answer or tolerance are invalid.
    pub fn numerical(
        id: QuestionId,
        subject: impl Into<String>,
        text: impl Into<String>,
        points_correct: f64,
        points_incorrect: f64,
        correct_answer: f64,
        tolerance: Option<f64>,
    ) -> Result<Self, QuestionError> {
        if !correct_answer.is_finite() {
            return Err(QuestionError::InvalidCorrectAnswer);
        }
        if let Some(tol) = tolerance {
            if !tol.is_finite() || tol <= 0.0 {
                return Err(QuestionError::InvalidTolerance(tol));
            }
        }

        Self::build(
            id,
            subject.into(),
            text.into(),
            points_correct,
            points_incorrect,
            QuestionKind::Numerical {
                correct_answer,
                tolerance,
            },
        )
    }

    fn build(
        id: QuestionId,
        subject: String,
        text: String,
        points_correct: f64,
        points_incorrect: f64,
        kind: QuestionKind,
    ) -> Result<Self, QuestionError> {
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if subject.trim().is_empty() {
            return Err(QuestionError::EmptySubject);
        }
        if !points_correct.is_finite() || points_correct <= 0.0 {
            return Err(QuestionError::InvalidPointsCorrect(points_correct));
        }
        if !points_incorrect.is_finite() || points_incorrect < 0.0 {
            return Err(QuestionError::InvalidPointsIncorrect(points_incorrect));
        }

        Ok(Self {
            id,
            subject,
            text,
            points_correct,
            points_incorrect,
            kind,
            explanation: None,
        })
    }

    /// Attach the explanation shown when results are reviewed.
    #[must_use]
    pub fn with_explanation(mut self, explanation: Option<String>) -> Self {
        self.explanation = explanation
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        self
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn points_correct(&self) -> f64 {
        self.points_correct
    }

    #[must_use]
    pub fn points_incorrect(&self) -> f64 {
        self.points_incorrect
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Options of a choice question; empty for numerical questions.
    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        match &self.kind {
            QuestionKind::Choice { options, .. } => options,
            QuestionKind::Numerical { .. } => &[],
        }
    }
}

//
// ─── DRAFTS (SERIALIZED SHAPE) ─────────────────────────────────────────────────
//

/// Unvalidated question as it appears in quiz JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub id: String,
    pub subject: String,
    pub text: String,
    pub points_correct: f64,
    pub points_incorrect: f64,
    #[serde(flatten)]
    pub kind: QuestionKindDraft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum QuestionKindDraft {
    #[serde(rename = "mcq")]
    Choice {
        options: Vec<OptionDraft>,
        correct_option_id: String,
    },
    #[serde(rename = "numerical")]
    Numerical {
        correct_answer: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tolerance: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDraft {
    pub id: String,
    pub text: String,
}

impl QuestionDraft {
    /// Validate the draft into a [`Question`].
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for empty ids or any rule violated by
    /// [`Question::choice`] / [`Question::numerical`].
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = QuestionId::new(self.id)?;
        let question = match self.kind {
            QuestionKindDraft::Choice {
                options,
                correct_option_id,
            } => {
                let options = options
                    .into_iter()
                    .map(|draft| {
                        Ok(QuestionOption {
                            id: OptionId::new(draft.id)?,
                            text: draft.text,
                        })
                    })
                    .collect::<Result<Vec<_>, IdError>>()?;
                Question::choice(
                    id,
                    self.subject,
                    self.text,
                    self.points_correct,
                    self.points_incorrect,
                    options,
                    OptionId::new(correct_option_id)?,
                )
            }
            QuestionKindDraft::Numerical {
                correct_answer,
                tolerance,
            } => Question::numerical(
                id,
                self.subject,
                self.text,
                self.points_correct,
                self.points_incorrect,
                correct_answer,
                tolerance,
            ),
        }?;
        Ok(question.with_explanation(self.explanation))
    }
}

impl From<&Question> for QuestionDraft {
    fn from(question: &Question) -> Self {
        let kind = match &question.kind {
            QuestionKind::Choice {
                options,
                correct_option,
            } => QuestionKindDraft::Choice {
                options: options
                    .iter()
                    .map(|option| OptionDraft {
                        id: option.id.to_string(),
                        text: option.text.clone(),
                    })
                    .collect(),
                correct_option_id: correct_option.to_string(),
            },
            QuestionKind::Numerical {
                correct_answer,
                tolerance,
            } => QuestionKindDraft::Numerical {
                correct_answer: *correct_answer,
                tolerance: *tolerance,
            },
        };

        Self {
            id: question.id.to_string(),
            subject: question.subject.clone(),
            text: question.text.clone(),
            points_correct: question.points_correct,
            points_incorrect: question.points_incorrect,
            kind,
            explanation: question.explanation.clone(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
