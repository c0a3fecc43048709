use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("example label cannot be empty")]
    EmptyExample,

    #[error("study description cannot be empty")]
    EmptyDescription,

    #[error("ground-truth label cannot be empty")]
    EmptyLevel,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One study record presented as a quiz question.
///
/// Immutable once loaded. A question is identified by its position in the
/// bank; the `number` field is display metadata carried over from the
/// dataset. The ground-truth label is compared verbatim against option
/// keys, so it is stored exactly as the dataset spells it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    number: String,
    example: String,
    study_description: String,
    methodology1: String,
    methodology2: String,
    results1: String,
    results2: String,
    level_of_explanation: String,
}

impl Question {
    /// Creates a new Question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the example label, study description, or
    /// ground-truth label is empty or whitespace-only. Methodology and
    /// result fragments may be empty; some dataset rows carry only one of
    /// each pair.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        number: impl Into<String>,
        example: impl Into<String>,
        study_description: impl Into<String>,
        methodology1: impl Into<String>,
        methodology2: impl Into<String>,
        results1: impl Into<String>,
        results2: impl Into<String>,
        level_of_explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let example = example.into();
        if example.trim().is_empty() {
            return Err(QuestionError::EmptyExample);
        }
        let study_description = study_description.into();
        if study_description.trim().is_empty() {
            return Err(QuestionError::EmptyDescription);
        }
        let level_of_explanation = level_of_explanation.into();
        if level_of_explanation.trim().is_empty() {
            return Err(QuestionError::EmptyLevel);
        }

        Ok(Self {
            number: number.into(),
            example,
            study_description,
            methodology1: methodology1.into(),
            methodology2: methodology2.into(),
            results1: results1.into(),
            results2: results2.into(),
            level_of_explanation,
        })
    }

    // Accessors
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    #[must_use]
    pub fn example(&self) -> &str {
        &self.example
    }

    #[must_use]
    pub fn study_description(&self) -> &str {
        &self.study_description
    }

    #[must_use]
    pub fn methodology1(&self) -> &str {
        &self.methodology1
    }

    #[must_use]
    pub fn methodology2(&self) -> &str {
        &self.methodology2
    }

    #[must_use]
    pub fn results1(&self) -> &str {
        &self.results1
    }

    #[must_use]
    pub fn results2(&self) -> &str {
        &self.results2
    }

    /// The ground-truth classification label for this study.
    #[must_use]
    pub fn level_of_explanation(&self) -> &str {
        &self.level_of_explanation
    }

    /// Convert into the dataset/persistence record shape.
    #[must_use]
    pub fn to_record(&self) -> QuestionRecord {
        QuestionRecord {
            number: NumberOrText::Text(self.number.clone()),
            example: self.example.clone(),
            study_description: self.study_description.clone(),
            methodology1: self.methodology1.clone(),
            methodology2: self.methodology2.clone(),
            results1: self.results1.clone(),
            results2: self.results2.clone(),
            level_of_explanation: self.level_of_explanation.clone(),
        }
    }
}

//
// ─── DATASET RECORD ────────────────────────────────────────────────────────────
//

/// The dataset's `Question` column holds either a number or a string,
/// depending on how the row was exported. Normalized to text on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(u32),
    Text(String),
}

impl NumberOrText {
    fn into_text(self) -> String {
        match self {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s,
        }
    }
}

/// Serialized shape for a question, carrying the dataset's CSV header
/// field names.
///
/// This mirrors the domain `Question` so the bank loader and storage can
/// serialize/deserialize without leaking wire concerns into the domain
/// type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "Question")]
    pub number: NumberOrText,
    #[serde(rename = "Example")]
    pub example: String,
    #[serde(rename = "Study Description")]
    pub study_description: String,
    #[serde(rename = "Methodology1", default)]
    pub methodology1: String,
    #[serde(rename = "Methodology2", default)]
    pub methodology2: String,
    #[serde(rename = "Results1", default)]
    pub results1: String,
    #[serde(rename = "Results2", default)]
    pub results2: String,
    #[serde(rename = "Level of Explanation")]
    pub level_of_explanation: String,
}

impl QuestionRecord {
    /// Convert the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if required fields fail validation.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(
            self.number.into_text(),
            self.example,
            self.study_description,
            self.methodology1,
            self.methodology2,
            self.results1,
            self.results2,
            self.level_of_explanation,
        )
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
            "Participants were surveyed.",
            "Recall was measured twice.",
            "Higher intake correlated with recall.",
            "Effect persisted after controls.",
            "Causal - Tests whether changes in one variable causally contribute to changes in another variable.",
        )
        .unwrap()
    }

    #[test]
    fn question_rejects_empty_example() {
        let err = Question::new("1", "  ", "desc", "", "", "", "", "label").unwrap_err();
        assert_eq!(err, QuestionError::EmptyExample);
    }

    #[test]
    fn question_rejects_empty_level() {
        let err = Question::new("1", "Example", "desc", "", "", "", "", " ").unwrap_err();
        assert_eq!(err, QuestionError::EmptyLevel);
    }

    #[test]
    fn record_roundtrip_preserves_fields() {
        let question = build_question();
        let record = question.to_record();
        let back = record.into_question().unwrap();
        assert_eq!(back, question);
    }

    #[test]
    fn record_parses_numeric_question_column() {
        let json = r#"{
            "Question": 3,
            "Example": "Sleep and mood",
            "Study Description": "A diary study.",
            "Methodology1": "Daily surveys.",
            "Methodology2": "",
            "Results1": "Mood tracked sleep.",
            "Results2": "",
            "Level of Explanation": "Inferential - Tests whether an association between two variables is likely to apply beyond the sample at hand."
        }"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        let question = record.into_question().unwrap();
        assert_eq!(question.number(), "3");
        assert_eq!(question.example(), "Sleep and mood");
    }
}
