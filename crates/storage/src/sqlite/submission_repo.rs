use chrono::{DateTime, Utc};
use quiz_core::model::{QuestionResponse, Submission, SubmissionId};
use sqlx::Row;
use std::collections::HashMap;

use super::{SqliteRepository, mapping};
use crate::repository::{StorageError, SubmissionRepository};

async fn responses_for(
    repo: &SqliteRepository,
    submission_ids: &[SubmissionId],
) -> Result<HashMap<SubmissionId, Vec<QuestionResponse>>, StorageError> {
    if submission_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut sql = String::from(
        r"
            SELECT submission_id, question_index, selected_answer,
                   reasoning, is_correct, question
            FROM responses
            WHERE submission_id IN (
        ",
    );
    for i in 0..submission_ids.len() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push('?');
        sql.push_str(&(i + 1).to_string());
    }
    sql.push_str(")\n ORDER BY submission_id ASC, question_index ASC");

    let mut query = sqlx::query(&sql);
    for id in submission_ids {
        query = query.bind(id.value());
    }

    let rows = query
        .fetch_all(repo.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    let mut grouped: HashMap<SubmissionId, Vec<QuestionResponse>> = HashMap::new();
    for row in rows {
        let (submission_id, response) = mapping::map_response_row(&row)?;
        grouped.entry(submission_id).or_default().push(response);
    }
    Ok(grouped)
}

fn assemble(
    id: SubmissionId,
    submitted_at: DateTime<Utc>,
    grouped: &mut HashMap<SubmissionId, Vec<QuestionResponse>>,
) -> Result<Submission, StorageError> {
    let responses = grouped.remove(&id).unwrap_or_default();
    Submission::from_persisted(id, responses, submitted_at).map_err(mapping::ser)
}

#[async_trait::async_trait]
impl SubmissionRepository for SqliteRepository {
    async fn append_submission(
        &self,
        responses: &[QuestionResponse],
        submitted_at: DateTime<Utc>,
    ) -> Result<SubmissionId, StorageError> {
        if responses.is_empty() {
            return Err(StorageError::Serialization("empty submission".into()));
        }

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let res = sqlx::query("INSERT INTO submissions (submitted_at) VALUES (?1)")
            .bind(submitted_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = SubmissionId::new(res.last_insert_rowid());

        for response in responses {
            sqlx::query(
                r"
                    INSERT INTO responses (
                        submission_id, question_index, selected_answer,
                        reasoning, is_correct, question
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(id.value())
            .bind(mapping::index_to_i64(response.question_index())?)
            .bind(response.selected_answer())
            .bind(response.reasoning())
            .bind(response.is_correct())
            .bind(mapping::question_to_json(response)?)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(id)
    }

    async fn get_submission(&self, id: SubmissionId) -> Result<Submission, StorageError> {
        let row = sqlx::query("SELECT submitted_at FROM submissions WHERE id = ?1")
            .bind(id.value())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .ok_or(StorageError::NotFound)?;
        let submitted_at: DateTime<Utc> = row.try_get("submitted_at").map_err(mapping::ser)?;

        let mut grouped = responses_for(self, &[id]).await?;
        assemble(id, submitted_at, &mut grouped)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Submission>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, submitted_at
                FROM submissions
                ORDER BY submitted_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut page = Vec::with_capacity(rows.len());
        for row in rows {
            let id = SubmissionId::new(row.try_get::<i64, _>("id").map_err(mapping::ser)?);
            let submitted_at: DateTime<Utc> = row.try_get("submitted_at").map_err(mapping::ser)?;
            page.push((id, submitted_at));
        }

        let ids: Vec<SubmissionId> = page.iter().map(|(id, _)| *id).collect();
        let mut grouped = responses_for(self, &ids).await?;

        let mut out = Vec::with_capacity(page.len());
        for (id, submitted_at) in page {
            out.push(assemble(id, submitted_at, &mut grouped)?);
        }
        Ok(out)
    }
}
