use quiz_core::model::Submission;

/// Fetched peer submissions, grouped on demand for per-question review
/// tabs.
///
/// Data is fetched once at entry to review; switching tabs only re-reads
/// this cache. Recency order of the fetch is preserved.
#[derive(Debug, Clone, Default)]
pub struct ReviewFeed {
    submissions: Vec<Submission>,
}

impl ReviewFeed {
    #[must_use]
    pub fn new(submissions: Vec<Submission>) -> Self {
        Self { submissions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    #[must_use]
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Reasonings recorded for question `question_index`, newest
    /// submission first. Submissions lacking that index are skipped, not
    /// rendered as blanks.
    #[must_use]
    pub fn reasonings_for(&self, question_index: usize) -> Vec<&str> {
        self.submissions
            .iter()
            .filter_map(|submission| submission.reasoning_for(question_index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuestionResponse, ResponseDraft, SubmissionId};
    use quiz_core::time::fixed_now;

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

    fn build_submission(id: i64, responses: Vec<QuestionResponse>) -> Submission {
        Submission::from_persisted(SubmissionId::new(id), responses, fixed_now()).unwrap()
    }

    #[test]
    fn groups_by_question_index_and_skips_missing() {
        let feed = ReviewFeed::new(vec![
            build_submission(3, vec![build_response(0, "newest about q0")]),
            build_submission(
                2,
                vec![
                    build_response(0, "older about q0"),
                    build_response(1, "older about q1"),
                ],
            ),
            build_submission(1, vec![build_response(1, "oldest about q1")]),
        ]);

        assert_eq!(
            feed.reasonings_for(0),
            vec!["newest about q0", "older about q0"]
        );
        assert_eq!(
            feed.reasonings_for(1),
            vec!["older about q1", "oldest about q1"]
        );
        assert!(feed.reasonings_for(2).is_empty());
    }

    #[test]
    fn empty_feed_yields_empty_tabs() {
        let feed = ReviewFeed::default();
        assert!(feed.is_empty());
        assert!(feed.reasonings_for(0).is_empty());
    }
}
