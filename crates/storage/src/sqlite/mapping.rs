use quiz_core::model::{QuestionRecord, QuestionResponse, SubmissionId};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn index_to_i64(v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization("question_index overflow".into()))
}

pub(crate) fn index_from_i64(v: i64) -> Result<usize, StorageError> {
    usize::try_from(v)
        .map_err(|_| StorageError::Serialization(format!("invalid question_index: {v}")))
}

/// Serialize the question payload copy for the document column.
pub(crate) fn question_to_json(response: &QuestionResponse) -> Result<String, StorageError> {
    serde_json::to_string(&response.question().to_record()).map_err(ser)
}

/// Map a joined response row back into the domain response plus its parent
/// submission id.
pub(crate) fn map_response_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<(SubmissionId, QuestionResponse), StorageError> {
    let submission_id = SubmissionId::new(row.try_get::<i64, _>("submission_id").map_err(ser)?);
    let question_index = index_from_i64(row.try_get::<i64, _>("question_index").map_err(ser)?)?;
    let selected_answer: String = row.try_get("selected_answer").map_err(ser)?;
    let reasoning: String = row.try_get("reasoning").map_err(ser)?;
    let is_correct: bool = row.try_get("is_correct").map_err(ser)?;

    let question_json: String = row.try_get("question").map_err(ser)?;
    let record: QuestionRecord = serde_json::from_str(&question_json).map_err(ser)?;
    let question = record.into_question().map_err(ser)?;

    Ok((
        submission_id,
        QuestionResponse::from_persisted(
            question_index,
            selected_answer,
            reasoning,
            is_correct,
            question,
        ),
    ))
}
