use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{IdError, QuestionId, QuizId};
use crate::model::question::{Question, QuestionDraft, QuestionError};
use crate::model::settings::SessionSettings;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Id(#[from] IdError),

    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("a quiz must have at least one question")]
    NoQuestions,

    #[error("duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),

    #[error("question {index} is invalid: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A validated quiz definition.
///
/// Question order defines navigation order and default numbering. A quiz
/// always holds at least one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuizDraft", into = "QuizDraft")]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: Option<String>,
    difficulty: Option<Difficulty>,
    instructions: Option<String>,
    settings: SessionSettings,
    questions: Vec<Question>,
}

impl Quiz {
    /// Assemble a quiz from already validated questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyTitle`, `QuizError::NoQuestions` or
    /// `QuizError::DuplicateQuestion`.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        description: Option<String>,
        difficulty: Option<Difficulty>,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        for (i, question) in questions.iter().enumerate() {
            if questions[..i].iter().any(|prev| prev.id() == question.id()) {
                return Err(QuizError::DuplicateQuestion(question.id().clone()));
            }
        }

        Ok(Self {
            id,
            title,
            description: normalize_optional(description),
            difficulty,
            instructions: None,
            settings: SessionSettings::untimed(),
            questions,
        })
    }

    /// Attach instructions shown before the quiz starts.
    #[must_use]
    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.instructions = normalize_optional(instructions);
        self
    }

    /// Attach the settings offered by default when a session starts.
    #[must_use]
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    #[must_use]
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    /// Default settings for a new session on this quiz.
    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question and its position by id.
    #[must_use]
    pub fn find(&self, id: &QuestionId) -> Option<(usize, &Question)> {
        self.questions
            .iter()
            .enumerate()
            .find(|(_, question)| question.id() == id)
    }

    /// Sum of the points awarded if every question is answered correctly.
    #[must_use]
    pub fn total_possible(&self) -> f64 {
        self.questions.iter().map(Question::points_correct).sum()
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated quiz as it appears in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<QuizSettingsDraft>,
    pub questions: Vec<QuestionDraft>,
}

/// Default session settings as they appear in quiz JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSettingsDraft {
    /// Minutes; `0` or absent means no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub negative_marking: bool,
}

impl From<QuizSettingsDraft> for SessionSettings {
    fn from(draft: QuizSettingsDraft) -> Self {
        SessionSettings::new(draft.time_limit, draft.negative_marking)
    }
}

impl From<SessionSettings> for QuizSettingsDraft {
    fn from(settings: SessionSettings) -> Self {
        Self {
            time_limit: settings.time_limit_minutes(),
            negative_marking: settings.negative_marking(),
        }
    }
}

impl QuizDraft {
    /// Validate the draft and every question in it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Question` with the failing index, or the quiz-level
    /// errors of [`Quiz::new`].
    pub fn validate(self) -> Result<Quiz, QuizError> {
        let id = QuizId::new(self.id)?;
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate()
                    .map_err(|source| QuizError::Question { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let settings = self.settings.map(SessionSettings::from).unwrap_or_default();
        Ok(
            Quiz::new(id, self.title, self.description, self.difficulty, questions)?
                .with_instructions(self.instructions)
                .with_settings(settings),
        )
    }
}

impl TryFrom<QuizDraft> for Quiz {
    type Error = QuizError;

    fn try_from(draft: QuizDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<&Quiz> for QuizDraft {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.to_string(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            difficulty: quiz.difficulty,
            instructions: quiz.instructions.clone(),
            settings: (quiz.settings != SessionSettings::default())
                .then(|| QuizSettingsDraft::from(quiz.settings)),
            questions: quiz.questions.iter().map(QuestionDraft::from).collect(),
        }
    }
}

impl From<Quiz> for QuizDraft {
    fn from(quiz: Quiz) -> Self {
        Self::from(&quiz)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
