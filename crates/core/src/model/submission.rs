use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::SubmissionId;
use crate::model::response::QuestionResponse;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("submission has no responses")]
    Empty,
}

/// A persisted, completed session: the full ordered response list plus the
/// store-assigned identity and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    id: SubmissionId,
    responses: Vec<QuestionResponse>,
    submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Rehydrate a submission from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Empty` if the response list is empty; the
    /// gateway never persists an empty submission.
    pub fn from_persisted(
        id: SubmissionId,
        responses: Vec<QuestionResponse>,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, SubmissionError> {
        if responses.is_empty() {
            return Err(SubmissionError::Empty);
        }
        Ok(Self {
            id,
            responses,
            submitted_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> SubmissionId {
        self.id
    }

    #[must_use]
    pub fn responses(&self) -> &[QuestionResponse] {
        &self.responses
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// The reasoning recorded for `question_index`, if this submission
    /// answered it. Submissions from other dataset variants may not cover
    /// every index.
    #[must_use]
    pub fn reasoning_for(&self, question_index: usize) -> Option<&str> {
        self.responses
            .iter()
            .find(|response| response.question_index() == question_index)
            .map(QuestionResponse::reasoning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, ResponseDraft};
    use crate::time::fixed_now;

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

    #[test]
    fn rejects_empty_response_list() {
        let err =
            Submission::from_persisted(SubmissionId::new(1), Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, SubmissionError::Empty);
    }

    #[test]
    fn reasoning_for_finds_matching_index_only() {
        let submission = Submission::from_persisted(
            SubmissionId::new(7),
            vec![build_response(0, "randomized design"), build_response(2, "held-out sample")],
            fixed_now(),
        )
        .unwrap();

        assert_eq!(submission.reasoning_for(0), Some("randomized design"));
        assert_eq!(submission.reasoning_for(1), None);
        assert_eq!(submission.reasoning_for(2), Some("held-out sample"));
    }
}
