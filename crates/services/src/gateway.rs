use async_trait::async_trait;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{QuestionResponse, Submission, SubmissionId};
use storage::repository::SubmissionRepository;

use crate::error::GatewayError;

/// Persistence boundary for completed sessions.
///
/// Implementations serialize the committed response list verbatim; the
/// persistence side assigns identity and timestamp. Neither operation is
/// retried by the gateway itself.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    /// Persist the full ordered response list as one submission.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotConfigured` when no persistence
    /// collaborator is available, `GatewayError::Rejected` when the list
    /// fails boundary validation, or a persistence error otherwise.
    async fn submit(
        &self,
        responses: &[QuestionResponse],
    ) -> Result<SubmissionId, GatewayError>;

    /// The most recently created submissions, newest first, up to `limit`.
    ///
    /// No read-your-write guarantee: a fetch immediately after `submit`
    /// may or may not include the new record.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotConfigured` when unconfigured, or a
    /// persistence error otherwise.
    async fn fetch_recent(&self, limit: u32) -> Result<Vec<Submission>, GatewayError>;
}

/// Boundary validation shared by gateway backends.
pub(crate) fn validate_responses(responses: &[QuestionResponse]) -> Result<(), GatewayError> {
    if responses.is_empty() {
        return Err(GatewayError::Rejected("submission has no responses".into()));
    }
    for response in responses {
        if response.selected_answer().is_empty() {
            return Err(GatewayError::Rejected(format!(
                "response {} has no selected answer",
                response.question_index()
            )));
        }
        if response.reasoning().is_empty() {
            return Err(GatewayError::Rejected(format!(
                "response {} has no reasoning",
                response.question_index()
            )));
        }
    }
    Ok(())
}

/// Gateway backed by the local document store.
///
/// `None` for the store means persistence was never configured; both
/// operations then fail with `NotConfigured` and the caller degrades
/// (review unavailable) instead of retrying.
#[derive(Clone)]
pub struct StoreGateway {
    clock: Clock,
    store: Option<Arc<dyn SubmissionRepository>>,
}

impl StoreGateway {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn SubmissionRepository>) -> Self {
        Self {
            clock,
            store: Some(store),
        }
    }

    /// A gateway with no persistence collaborator (degraded mode).
    #[must_use]
    pub fn unconfigured(clock: Clock) -> Self {
        Self { clock, store: None }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.store.is_some()
    }
}

#[async_trait]
impl SubmissionGateway for StoreGateway {
    async fn submit(
        &self,
        responses: &[QuestionResponse],
    ) -> Result<SubmissionId, GatewayError> {
        let store = self.store.as_ref().ok_or(GatewayError::NotConfigured)?;
        validate_responses(responses)?;
        let id = store.append_submission(responses, self.clock.now()).await?;
        tracing::debug!(id = id.value(), count = responses.len(), "submission persisted");
        Ok(id)
    }

    async fn fetch_recent(&self, limit: u32) -> Result<Vec<Submission>, GatewayError> {
        let store = self.store.as_ref().ok_or(GatewayError::NotConfigured)?;
        Ok(store.list_recent(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, ResponseDraft};
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn build_response(question_index: usize, reasoning: &str) -> QuestionResponse {
        let question = Question::new(
            (question_index + 1).to_string(),
            format!("Study {question_index}"),
            "A study description.",
            "",
            "",
            "",
            "",
            "Causal - Tests whether changes in one variable causally contribute to changes in another variable.",
        )
        .unwrap();
        let mut draft = ResponseDraft::new();
        draft.select(question.level_of_explanation());
        draft.set_reasoning(reasoning);
        QuestionResponse::new(question_index, question, &draft).unwrap()
    }

    #[tokio::test]
    async fn unconfigured_gateway_degrades_on_both_operations() {
        let gateway = StoreGateway::unconfigured(fixed_clock());
        assert!(!gateway.enabled());

        let err = gateway
            .submit(&[build_response(0, "a full reasoning")])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));

        let err = gateway.fetch_recent(15).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
    }

    #[tokio::test]
    async fn empty_submission_is_rejected_before_the_store() {
        let gateway = StoreGateway::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
        let err = gateway.submit(&[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
    }

    #[tokio::test]
    async fn submit_then_fetch_recent_roundtrips() {
        let gateway = StoreGateway::new(fixed_clock(), Arc::new(InMemoryRepository::new()));

        let id = gateway
            .submit(&[
                build_response(0, "randomized assignment"),
                build_response(1, "held-out sample check"),
            ])
            .await
            .unwrap();

        let recent = gateway.fetch_recent(15).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id(), id);
        assert_eq!(recent[0].responses().len(), 2);
    }
}
