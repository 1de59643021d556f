//! Bundled example quizzes used by the `seed` command and by tests.

use quiz_core::model::{Quiz, QuizDraft, QuizError};
use thiserror::Error;

const EXAMPLE_QUIZZES_JSON: &str = include_str!("../fixtures/example_quizzes.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("invalid quiz JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Parse a JSON document holding either a single quiz or an array of quizzes.
///
/// # Errors
///
/// Returns `CatalogError::Json` for malformed JSON and `CatalogError::Quiz`
/// for the first quiz that fails validation.
pub fn parse_quizzes(json: &str) -> Result<Vec<Quiz>, CatalogError> {
    // Pick the shape up front so serde reports the failing field and line.
    let drafts: Vec<QuizDraft> = if json.trim_start().starts_with('[') {
        serde_json::from_str(json)?
    } else {
        vec![serde_json::from_str(json)?]
    };
    drafts
        .into_iter()
        .map(|draft| draft.validate().map_err(CatalogError::from))
        .collect()
}

/// The bundled example quizzes.
///
/// # Errors
///
/// Returns `CatalogError` if the bundled fixture is invalid.
pub fn example_quizzes() -> Result<Vec<Quiz>, CatalogError> {
    parse_quizzes(EXAMPLE_QUIZZES_JSON)
}
