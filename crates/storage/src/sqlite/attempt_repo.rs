use quiz_core::model::{Attempt, QuizId};

use super::SqliteRepository;
use super::mapping::{
    breakdown_to_json, conn, map_attempt_row, map_attempt_row_with_id, u64_to_i64,
};
use crate::repository::{AttemptId, AttemptRepository, AttemptRow, StorageError};

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn append_attempt(&self, attempt: &Attempt) -> Result<AttemptId, StorageError> {
        let result = attempt.result();
        let settings = attempt.settings();
        let breakdown = breakdown_to_json(&result.breakdown)?;

        let res = sqlx::query(
            r"
                INSERT INTO attempts (
                    quiz_id, quiz_title, started_at, completed_at,
                    time_limit_minutes, negative_marking,
                    score, total_possible, elapsed_seconds, finish_reason, breakdown
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ",
        )
        .bind(attempt.quiz_id().as_str())
        .bind(attempt.quiz_title())
        .bind(attempt.started_at())
        .bind(attempt.completed_at())
        .bind(settings.time_limit_minutes().map(i64::from))
        .bind(settings.negative_marking())
        .bind(result.score)
        .bind(result.total_possible)
        .bind(u64_to_i64("elapsed_seconds", result.elapsed_seconds)?)
        .bind(result.finish_reason.as_str())
        .bind(breakdown)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        let id = res.last_insert_rowid();
        tracing::debug!(attempt_id = id, quiz_id = %attempt.quiz_id(), "attempt stored");
        Ok(id)
    }

    async fn get_attempt(&self, id: AttemptId) -> Result<Attempt, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    quiz_id, quiz_title, started_at, completed_at,
                    time_limit_minutes, negative_marking,
                    score, total_possible, elapsed_seconds, finish_reason, breakdown
                FROM attempts
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        map_attempt_row(&row)
    }

    async fn list_attempts(
        &self,
        quiz_id: Option<&QuizId>,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, quiz_id, quiz_title, started_at, completed_at,
                    time_limit_minutes, negative_marking,
                    score, total_possible, elapsed_seconds, finish_reason, breakdown
                FROM attempts
                WHERE (?1 IS NULL OR quiz_id = ?1)
                ORDER BY completed_at DESC, id DESC
                LIMIT ?2
            ",
        )
        .bind(quiz_id.map(QuizId::as_str))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_attempt_row_with_id).collect()
    }
}
