use quiz_core::model::{Quiz, QuizId};

use super::SqliteRepository;
use super::mapping::{conn, map_quiz_row, quiz_to_body, usize_to_i64};
use crate::repository::{QuizRepository, StorageError};

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let body = quiz_to_body(quiz)?;
        let question_count = usize_to_i64("question_count", quiz.question_count())?;

        sqlx::query(
            r"
                INSERT INTO quizzes (id, title, question_count, body)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    question_count = excluded.question_count,
                    body = excluded.body
            ",
        )
        .bind(quiz.id().as_str())
        .bind(quiz.title())
        .bind(question_count)
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, StorageError> {
        let row = sqlx::query("SELECT body FROM quizzes WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_quiz_row).transpose()
    }

    async fn list_quizzes(&self, limit: u32) -> Result<Vec<Quiz>, StorageError> {
        let rows = sqlx::query("SELECT body FROM quizzes ORDER BY id ASC LIMIT ?1")
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_quiz_row).collect()
    }

    async fn delete_quiz(&self, id: &QuizId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM quizzes WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
