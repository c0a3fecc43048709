//! Wire contract for the submissions interface.
//!
//! Request bodies are a tagged union with an explicit `kind` discriminator,
//! validated at the boundary before anything reaches domain logic. The
//! status mapping mirrors the deployed endpoints: 503 when persistence is
//! unconfigured, 400 for validation failures, 500 for everything else.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    QuestionRecord, QuestionResponse, SessionId, Submission, SubmissionId,
};

use crate::error::GatewayError;

/// Fetch cap used by the causal-level deployment variant.
pub const CAUSAL_LEVEL_FETCH_LIMIT: u32 = 15;

/// Fetch cap used by the paired-analysis deployment variant.
pub const PAIRED_ANALYSIS_FETCH_LIMIT: u32 = 30;

/// Collection name reported for causal-level submissions.
pub const CAUSAL_LEVEL_COLLECTION: &str = "causalLevel";

//
// ─── RESPONSE DTO ──────────────────────────────────────────────────────────────
//

/// One committed answer on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDto {
    pub question_index: usize,
    pub selected_answer: String,
    pub reasoning: String,
    pub is_correct: bool,
    pub question: QuestionRecord,
}

impl ResponseDto {
    #[must_use]
    pub fn from_response(response: &QuestionResponse) -> Self {
        Self {
            question_index: response.question_index(),
            selected_answer: response.selected_answer().to_owned(),
            reasoning: response.reasoning().to_owned(),
            is_correct: response.is_correct(),
            question: response.question().to_record(),
        }
    }

    /// Convert into a domain response, trusting the recorded correctness.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Rejected` if the embedded question payload
    /// fails validation.
    pub fn into_response(self) -> Result<QuestionResponse, GatewayError> {
        let question = self
            .question
            .into_question()
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;
        Ok(QuestionResponse::from_persisted(
            self.question_index,
            self.selected_answer,
            self.reasoning,
            self.is_correct,
            question,
        ))
    }
}

//
// ─── SUBMISSION PAYLOADS ───────────────────────────────────────────────────────
//

/// Submission request body.
///
/// One variant per deployment, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SubmissionPayload {
    #[serde(rename = "causalLevel")]
    CausalLevel { responses: Vec<ResponseDto> },

    #[serde(rename = "pairedAnalysis", rename_all = "camelCase")]
    PairedAnalysis {
        table_analysis: String,
        graph_analysis: String,
    },

    #[serde(rename = "timedSession", rename_all = "camelCase")]
    TimedSession {
        session_id: SessionId,
        start_time: DateTime<Utc>,
        responses: Vec<ResponseDto>,
    },
}

impl SubmissionPayload {
    /// The causal-level payload for a committed response list.
    #[must_use]
    pub fn causal_level(responses: &[QuestionResponse]) -> Self {
        Self::CausalLevel {
            responses: responses.iter().map(ResponseDto::from_response).collect(),
        }
    }
}

/// 2xx response body for a stored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionAccepted {
    pub success: bool,
    pub id: SubmissionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

/// Error response body for every non-2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

//
// ─── FETCH ENVELOPE ────────────────────────────────────────────────────────────
//

/// One persisted submission on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDto {
    pub id: SubmissionId,
    pub responses: Vec<ResponseDto>,
    pub timestamp: DateTime<Utc>,
}

impl SubmissionDto {
    #[must_use]
    pub fn from_submission(submission: &Submission) -> Self {
        Self {
            id: submission.id(),
            responses: submission
                .responses()
                .iter()
                .map(ResponseDto::from_response)
                .collect(),
            timestamp: submission.submitted_at(),
        }
    }

    /// Convert into a domain submission.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Rejected` if the response list is empty or a
    /// question payload fails validation.
    pub fn into_submission(self) -> Result<Submission, GatewayError> {
        let mut responses = Vec::with_capacity(self.responses.len());
        for dto in self.responses {
            responses.push(dto.into_response()?);
        }
        Submission::from_persisted(self.id, responses, self.timestamp)
            .map_err(|e| GatewayError::Rejected(e.to_string()))
    }
}

/// GET response body: recent submissions, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionsEnvelope {
    pub submissions: Vec<SubmissionDto>,
}

//
// ─── STATUS MAPPING ────────────────────────────────────────────────────────────
//

/// The HTTP status a gateway error maps to on the wire.
#[must_use]
pub fn status_for(error: &GatewayError) -> StatusCode {
    match error {
        GatewayError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        GatewayError::Rejected(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
