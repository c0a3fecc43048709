use std::env;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use quiz_core::model::{QuestionResponse, Submission, SubmissionId};

use crate::error::GatewayError;
use crate::gateway::{SubmissionGateway, validate_responses};
use crate::wire::{ErrorBody, SubmissionAccepted, SubmissionPayload, SubmissionsEnvelope};

/// Configuration for a deployed submissions endpoint.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: String,
}

impl RemoteConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("QUIZ_SUBMISSIONS_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        Some(Self { base_url })
    }
}

/// Gateway speaking the wire contract against a deployed submissions
/// endpoint instead of a local store.
#[derive(Clone)]
pub struct RemoteGateway {
    client: Client,
    config: Option<RemoteConfig>,
}

impl RemoteGateway {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(RemoteConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<RemoteConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    fn submissions_url(config: &RemoteConfig) -> String {
        format!("{}/submissions", config.base_url.trim_end_matches('/'))
    }

    async fn map_error(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return GatewayError::NotConfigured;
        }
        if status == StatusCode::BAD_REQUEST {
            let message = response
                .json::<ErrorBody>()
                .await
                .map_or_else(|_| "bad request".to_owned(), |body| body.error);
            return GatewayError::Rejected(message);
        }
        GatewayError::UpstreamStatus(status)
    }
}

#[async_trait]
impl SubmissionGateway for RemoteGateway {
    async fn submit(
        &self,
        responses: &[QuestionResponse],
    ) -> Result<SubmissionId, GatewayError> {
        let config = self.config.as_ref().ok_or(GatewayError::NotConfigured)?;
        validate_responses(responses)?;

        let response = self
            .client
            .post(Self::submissions_url(config))
            .json(&SubmissionPayload::causal_level(responses))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::map_error(response).await);
        }

        let body: SubmissionAccepted = response.json().await?;
        tracing::debug!(id = body.id.value(), "submission accepted upstream");
        Ok(body.id)
    }

    async fn fetch_recent(&self, limit: u32) -> Result<Vec<Submission>, GatewayError> {
        let config = self.config.as_ref().ok_or(GatewayError::NotConfigured)?;

        let response = self
            .client
            .get(Self::submissions_url(config))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::map_error(response).await);
        }

        let envelope: SubmissionsEnvelope = response.json().await?;
        let mut submissions = Vec::with_capacity(envelope.submissions.len());
        for dto in envelope.submissions {
            submissions.push(dto.into_submission()?);
        }
        submissions.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;
    use crate::gateway::StoreGateway;

    #[tokio::test]
    async fn disabled_remote_gateway_reports_not_configured() {
        let gateway = RemoteGateway::new(None);
        assert!(!gateway.enabled());

        let err = gateway.submit(&[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));

        let err = gateway.fetch_recent(15).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));

        // Same degraded behavior as an unconfigured local store.
        let local = StoreGateway::unconfigured(fixed_clock());
        let err = local.fetch_recent(15).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
    }

    #[test]
    fn submissions_url_joins_without_double_slash() {
        let config = RemoteConfig {
            base_url: "https://quiz.example.org/api/".into(),
        };
        assert_eq!(
            RemoteGateway::submissions_url(&config),
            "https://quiz.example.org/api/submissions"
        );
    }
}
