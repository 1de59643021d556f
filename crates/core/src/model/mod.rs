mod answer;
mod attempt;
mod ids;
mod question;
mod quiz;
mod result;
mod settings;

pub use answer::{AnswerError, AnswerMap, AnswerValue};
pub use attempt::{Attempt, AttemptError};
pub use ids::{IdError, OptionId, QuestionId, QuizId};
pub use question::{
    OptionDraft, Question, QuestionDraft, QuestionError, QuestionKind, QuestionKindDraft,
    QuestionOption,
};
pub use quiz::{Difficulty, Quiz, QuizDraft, QuizError, QuizSettingsDraft};
pub use result::{AttemptResult, FinishReason, QuestionOutcome};
pub use settings::{SessionSettings, TIME_LIMIT_PRESETS};
