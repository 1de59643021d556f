use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{IdError, OptionId, QuestionId};
use crate::model::question::{Question, QuestionKind};

/// Submitted answers keyed by question. A missing entry means unanswered.
pub type AnswerMap = HashMap<QuestionId, AnswerValue>;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("answer cannot be empty")]
    Empty,

    #[error("{0} is not an option of this question")]
    UnknownOption(OptionId),

    #[error("expected a number, got {raw:?}")]
    NotANumber { raw: String },

    #[error(transparent)]
    Id(#[from] IdError),
}

/// A submitted answer value.
///
/// Serialized untagged: a string for a choice option id, a number for a
/// numerical answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choice(OptionId),
    Numerical(f64),
}

impl AnswerValue {
    /// Returns true if the value has the same variant as the question.
    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        matches!(
            (self, question.kind()),
            (AnswerValue::Choice(_), QuestionKind::Choice { .. })
                | (AnswerValue::Numerical(_), QuestionKind::Numerical { .. })
        )
    }

    /// Parse user input into an answer shaped for `question`.
    ///
    /// Choice questions accept an option id; numerical questions accept any
    /// finite number.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` if the input is empty, names an unknown option,
    /// or is not a finite number.
    pub fn parse_for(question: &Question, raw: &str) -> Result<Self, AnswerError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AnswerError::Empty);
        }
        match question.kind() {
            QuestionKind::Choice { options, .. } => {
                let id = OptionId::new(raw)?;
                if options.iter().any(|option| option.id == id) {
                    Ok(AnswerValue::Choice(id))
                } else {
                    Err(AnswerError::UnknownOption(id))
                }
            }
            QuestionKind::Numerical { .. } => raw
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(AnswerValue::Numerical)
                .ok_or_else(|| AnswerError::NotANumber {
                    raw: raw.to_owned(),
                }),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Choice(id) => write!(f, "{id}"),
            AnswerValue::Numerical(value) => write!(f, "{value}"),
        }
    }
}
