use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{QuestionResponse, Submission, SubmissionId};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for persisted submissions.
///
/// The store assigns identifiers; `submitted_at` comes from the caller's
/// clock so time stays deterministic in tests.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Persist a completed response list as one submission, atomically.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for an empty response list,
    /// or other storage errors if the submission cannot be stored.
    async fn append_submission(
        &self,
        responses: &[QuestionResponse],
        submitted_at: DateTime<Utc>,
    ) -> Result<SubmissionId, StorageError>;

    /// Fetch a submission by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_submission(&self, id: SubmissionId) -> Result<Submission, StorageError>;

    /// The most recently created submissions, newest first, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_recent(&self, limit: u32) -> Result<Vec<Submission>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Mutex<InMemoryState>>,
}

#[derive(Default)]
struct InMemoryState {
    next_id: i64,
    submissions: Vec<Submission>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryRepository {
    async fn append_submission(
        &self,
        responses: &[QuestionResponse],
        submitted_at: DateTime<Utc>,
    ) -> Result<SubmissionId, StorageError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.next_id += 1;
        let id = SubmissionId::new(guard.next_id);
        let submission = Submission::from_persisted(id, responses.to_vec(), submitted_at)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        guard.submissions.push(submission);
        Ok(id)
    }

    async fn get_submission(&self, id: SubmissionId) -> Result<Submission, StorageError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .submissions
            .iter()
            .find(|submission| submission.id() == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Submission>, StorageError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard
            .submissions
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Aggregates submission storage behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub submissions: Arc<dyn SubmissionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            submissions: Arc::new(InMemoryRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, ResponseDraft};
    use quiz_core::time::fixed_now;

    fn build_response(question_index: usize, reasoning: &str) -> QuestionResponse {
        let question = Question::new(
            (question_index + 1).to_string(),
            format!("Study {question_index}"),
            "A study description.",
            "Method A.",
            "Method B.",
            "Result A.",
            "Result B.",
            "Causal - Tests whether changes in one variable causally contribute to changes in another variable.",
        )
        .unwrap();
        let mut draft = ResponseDraft::new();
        draft.select(question.level_of_explanation());
        draft.set_reasoning(reasoning);
        QuestionResponse::new(question_index, question, &draft).unwrap()
    }

    #[tokio::test]
    async fn append_assigns_monotonic_ids() {
        let repo = InMemoryRepository::new();
        let first = repo
            .append_submission(&[build_response(0, "randomized assignment")], fixed_now())
            .await
            .unwrap();
        let second = repo
            .append_submission(&[build_response(0, "held-out test sample")], fixed_now())
            .await
            .unwrap();
        assert!(second > first);

        let fetched = repo.get_submission(first).await.unwrap();
        assert_eq!(fetched.responses().len(), 1);
    }

    #[tokio::test]
    async fn list_recent_is_newest_first_and_capped() {
        let repo = InMemoryRepository::new();
        for n in 0..4 {
            repo.append_submission(
                &[build_response(0, &format!("reasoning number {n}"))],
                fixed_now(),
            )
            .await
            .unwrap();
        }

        let recent = repo.list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].responses()[0].reasoning(), "reasoning number 3");
        assert_eq!(recent[1].responses()[0].reasoning(), "reasoning number 2");
    }

    #[tokio::test]
    async fn empty_submission_is_rejected() {
        let repo = InMemoryRepository::new();
        let err = repo.append_submission(&[], fixed_now()).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn missing_submission_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .get_submission(SubmissionId::new(99))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
