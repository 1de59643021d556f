use quiz_core::model::{
    Attempt, AttemptResult, FinishReason, QuestionOutcome, Quiz, QuizDraft, QuizId,
    SessionSettings,
};
use sqlx::Row;

use crate::repository::{AttemptRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn usize_to_i64(field: &'static str, v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn parse_finish_reason(s: &str) -> Result<FinishReason, StorageError> {
    FinishReason::parse(s)
        .ok_or_else(|| StorageError::Serialization(format!("invalid finish_reason: {s}")))
}

/// Quizzes are stored as their JSON draft; decoding re-runs validation.
pub(crate) fn quiz_to_body(quiz: &Quiz) -> Result<String, StorageError> {
    serde_json::to_string(&QuizDraft::from(quiz)).map_err(ser)
}

pub(crate) fn map_quiz_row(row: &sqlx::sqlite::SqliteRow) -> Result<Quiz, StorageError> {
    let body: String = row.try_get("body").map_err(ser)?;
    let draft: QuizDraft = serde_json::from_str(&body).map_err(ser)?;
    draft.validate().map_err(ser)
}

pub(crate) fn breakdown_to_json(breakdown: &[QuestionOutcome]) -> Result<String, StorageError> {
    serde_json::to_string(breakdown).map_err(ser)
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<Attempt, StorageError> {
    let quiz_id = QuizId::new(row.try_get::<String, _>("quiz_id").map_err(ser)?).map_err(ser)?;
    let quiz_title: String = row.try_get("quiz_title").map_err(ser)?;
    let started_at = row.try_get("started_at").map_err(ser)?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;

    let time_limit_minutes = row
        .try_get::<Option<i64>, _>("time_limit_minutes")
        .map_err(ser)?
        .map(|v| i64_to_u32("time_limit_minutes", v))
        .transpose()?;
    let negative_marking: bool = row.try_get("negative_marking").map_err(ser)?;
    let settings = SessionSettings::new(time_limit_minutes, negative_marking);

    let breakdown_json: String = row.try_get("breakdown").map_err(ser)?;
    let breakdown: Vec<QuestionOutcome> = serde_json::from_str(&breakdown_json).map_err(ser)?;
    let finish_reason_str: String = row.try_get("finish_reason").map_err(ser)?;

    let result = AttemptResult {
        score: row.try_get("score").map_err(ser)?,
        breakdown,
        total_possible: row.try_get("total_possible").map_err(ser)?,
        elapsed_seconds: i64_to_u64(
            "elapsed_seconds",
            row.try_get::<i64, _>("elapsed_seconds").map_err(ser)?,
        )?,
        finish_reason: parse_finish_reason(&finish_reason_str)?,
    };

    Attempt::from_persisted(
        quiz_id,
        quiz_title,
        started_at,
        completed_at,
        settings,
        result,
    )
    .map_err(ser)
}

pub(crate) fn map_attempt_row_with_id(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<AttemptRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    Ok(AttemptRow::new(id, map_attempt_row(row)?))
}
