use std::sync::Arc;

use quiz_core::model::{Difficulty, Quiz, QuizDraft, QuizId};
use storage::catalog::{example_quizzes, parse_quizzes};
use storage::repository::{QuizRepository, StorageError};

use crate::error::QuizServiceError;

/// Listing entry for a stored quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizListItem {
    pub id: QuizId,
    pub title: String,
    pub difficulty: Option<Difficulty>,
    pub question_count: usize,
    pub total_possible: f64,
}

impl QuizListItem {
    #[must_use]
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id().clone(),
            title: quiz.title().to_owned(),
            difficulty: quiz.difficulty(),
            question_count: quiz.question_count(),
            total_possible: quiz.total_possible(),
        }
    }
}

/// Authoring side: validates quiz definitions and stores them.
#[derive(Clone)]
pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { quizzes }
    }

    /// Parse a JSON document (one quiz or an array), validate and store it.
    ///
    /// Nothing is stored unless every quiz in the document is valid.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Catalog` for malformed or invalid quizzes.
    /// Returns `QuizServiceError::Storage` if persistence fails.
    pub async fn import_json(&self, json: &str) -> Result<Vec<QuizId>, QuizServiceError> {
        let quizzes = parse_quizzes(json)?;
        self.store_all(&quizzes).await
    }

    /// Store the bundled example quizzes.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError` if the catalog is invalid or storage fails.
    pub async fn seed_examples(&self) -> Result<Vec<QuizId>, QuizServiceError> {
        let quizzes = example_quizzes()?;
        self.store_all(&quizzes).await
    }

    /// Validate a draft and store it, replacing any quiz with the same id.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` for validation failures.
    /// Returns `QuizServiceError::Storage` if persistence fails.
    pub async fn save(&self, draft: QuizDraft) -> Result<Quiz, QuizServiceError> {
        let quiz = draft.validate()?;
        self.quizzes.upsert_quiz(&quiz).await?;
        tracing::info!(quiz_id = %quiz.id(), questions = quiz.question_count(), "quiz saved");
        Ok(quiz)
    }

    /// Fetch a quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound` if the quiz does not exist.
    pub async fn get(&self, id: &QuizId) -> Result<Quiz, QuizServiceError> {
        self.quizzes
            .get_quiz(id)
            .await?
            .ok_or_else(|| QuizServiceError::NotFound(id.clone()))
    }

    /// List quizzes ordered by id, up to the given limit.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn list(&self, limit: u32) -> Result<Vec<QuizListItem>, QuizServiceError> {
        let quizzes = self.quizzes.list_quizzes(limit).await?;
        Ok(quizzes.iter().map(QuizListItem::from_quiz).collect())
    }

    /// Delete a quiz. Past attempts stay in the history.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound` if the quiz does not exist.
    pub async fn delete(&self, id: &QuizId) -> Result<(), QuizServiceError> {
        self.quizzes.delete_quiz(id).await.map_err(|e| match e {
            StorageError::NotFound => QuizServiceError::NotFound(id.clone()),
            other => other.into(),
        })?;
        tracing::info!(quiz_id = %id, "quiz deleted");
        Ok(())
    }

    async fn store_all(&self, quizzes: &[Quiz]) -> Result<Vec<QuizId>, QuizServiceError> {
        let mut ids = Vec::with_capacity(quizzes.len());
        for quiz in quizzes {
            self.quizzes.upsert_quiz(quiz).await?;
            tracing::info!(quiz_id = %quiz.id(), questions = quiz.question_count(), "quiz stored");
            ids.push(quiz.id().clone());
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizError;
    use storage::catalog::CatalogError;
    use storage::repository::InMemoryRepository;

    fn service() -> QuizService {
        QuizService::new(Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn seed_then_list() {
        let svc = service();
        let ids = svc.seed_examples().await.unwrap();
        assert_eq!(ids.len(), 2);

        let items = svc.list(10).await.unwrap();
        assert_eq!(items[0].id.as_str(), "sci-mock-1");
        assert_eq!(items[0].question_count, 5);
        assert_eq!(items[0].difficulty, Some(Difficulty::Medium));
    }

    #[tokio::test]
    async fn import_rejects_invalid_documents_without_storing() {
        let svc = service();
        let json = r#"[
            {"id":"ok","title":"Fine","questions":[
                {"id":"q","subject":"S","text":"T","type":"numerical",
                 "pointsCorrect":1,"pointsIncorrect":0,"correctAnswer":1}
            ]},
            {"id":"dup","title":"Dup","questions":[
                {"id":"q","subject":"S","text":"T","type":"numerical",
                 "pointsCorrect":1,"pointsIncorrect":0,"correctAnswer":1},
                {"id":"q","subject":"S","text":"T","type":"numerical",
                 "pointsCorrect":1,"pointsIncorrect":0,"correctAnswer":2}
            ]}
        ]"#;
        let err = svc.import_json(json).await.unwrap_err();
        assert!(matches!(
            err,
            QuizServiceError::Catalog(CatalogError::Quiz(QuizError::DuplicateQuestion(_)))
        ));
        assert!(svc.list(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_get_and_delete() {
        let svc = service();
        let draft: QuizDraft = serde_json::from_str(
            r#"{"id":" mine ","title":"Mine","questions":[
                {"id":"q","subject":"S","text":"T","type":"numerical",
                 "pointsCorrect":1,"pointsIncorrect":0,"correctAnswer":1}
            ]}"#,
        )
        .unwrap();
        let quiz = svc.save(draft).await.unwrap();
        assert_eq!(quiz.id().as_str(), "mine");

        assert_eq!(svc.get(quiz.id()).await.unwrap(), quiz);
        svc.delete(quiz.id()).await.unwrap();
        assert!(matches!(
            svc.get(quiz.id()).await.unwrap_err(),
            QuizServiceError::NotFound(_)
        ));
        assert!(matches!(
            svc.delete(quiz.id()).await.unwrap_err(),
            QuizServiceError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn save_rejects_quiz_without_questions() {
        let svc = service();
        let draft: QuizDraft =
            serde_json::from_str(r#"{"id":"empty","title":"Empty","questions":[]}"#).unwrap();
        assert!(matches!(
            svc.save(draft).await.unwrap_err(),
            QuizServiceError::Quiz(QuizError::NoQuestions)
        ));
        assert!(svc.list(10).await.unwrap().is_empty());
    }
}
