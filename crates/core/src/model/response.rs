use thiserror::Error;

use crate::evaluate;
use crate::model::question::Question;

/// Minimum reasoning length (in characters) required to advance past a
/// question.
pub const MIN_REASONING_CHARS: usize = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResponseError {
    #[error("no option selected")]
    NoSelection,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Transient, per-question in-progress answer state.
///
/// Exists only for the active question index; navigating without a commit
/// discards it. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDraft {
    selected: Option<String>,
    reasoning: String,
}

impl ResponseDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the chosen option key. Selecting again overwrites.
    pub fn select(&mut self, key: impl Into<String>) {
        self.selected = Some(key.into());
    }

    /// Replace the free-text reasoning.
    pub fn set_reasoning(&mut self, text: impl Into<String>) {
        self.reasoning = text.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

//
// ─── COMMITTED RESPONSE ────────────────────────────────────────────────────────
//

/// A committed, immutable answer record for one question.
///
/// Carries a copy of the question payload so a persisted submission stays
/// readable even if the dataset changes underneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResponse {
    question_index: usize,
    selected_answer: String,
    reasoning: String,
    is_correct: bool,
    question: Question,
}

impl QuestionResponse {
    /// Commit a draft against the question at `question_index`.
    ///
    /// Correctness is computed here. The caller decides whether the
    /// forward-transition gate must hold; fetched peer data may
    /// legitimately contain incorrect answers.
    ///
    /// # Errors
    ///
    /// Returns `ResponseError::NoSelection` if the draft has no selected
    /// option.
    pub fn new(
        question_index: usize,
        question: Question,
        draft: &ResponseDraft,
    ) -> Result<Self, ResponseError> {
        let selected = draft.selected().ok_or(ResponseError::NoSelection)?;
        let is_correct = evaluate::is_correct(&question, selected);
        Ok(Self {
            question_index,
            selected_answer: selected.to_owned(),
            reasoning: draft.reasoning().to_owned(),
            is_correct,
            question,
        })
    }

    /// Rehydrate a response from storage, trusting the stored correctness
    /// flag.
    #[must_use]
    pub fn from_persisted(
        question_index: usize,
        selected_answer: String,
        reasoning: String,
        is_correct: bool,
        question: Question,
    ) -> Self {
        Self {
            question_index,
            selected_answer,
            reasoning,
            is_correct,
            question,
        }
    }

    // Accessors
    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    #[must_use]
    pub fn selected_answer(&self) -> &str {
        &self.selected_answer
    }

    #[must_use]
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build_question() -> Question {
        Question::new(
            "1",
            "Coffee and memory",
            "A study of coffee intake and recall.",
            "",
            "",
            "",
            "",
            "Causal - Tests whether changes in one variable causally contribute to changes in another variable.",
        )
        .unwrap()
    }

    #[test]
    fn commit_requires_a_selection() {
        let draft = ResponseDraft::new();
        let err = QuestionResponse::new(0, build_question(), &draft).unwrap_err();
        assert_eq!(err, ResponseError::NoSelection);
    }

    #[test]
    fn commit_computes_correctness() {
        let question = build_question();
        let mut draft = ResponseDraft::new();
        draft.select(question.level_of_explanation());
        draft.set_reasoning("the intervention was randomized");

        let response = QuestionResponse::new(0, question.clone(), &draft).unwrap();
        assert!(response.is_correct());
        assert_eq!(response.question_index(), 0);

        draft.select("Exploratory -  Searches for phenomena or correlations but does not or cannot test whether a relationship may be spurious.");
        let response = QuestionResponse::new(0, question, &draft).unwrap();
        assert!(!response.is_correct());
    }

    #[test]
    fn draft_clear_resets_both_fields() {
        let mut draft = ResponseDraft::new();
        draft.select("anything");
        draft.set_reasoning("because");
        draft.clear();
        assert_eq!(draft.selected(), None);
        assert_eq!(draft.reasoning(), "");
    }
}
