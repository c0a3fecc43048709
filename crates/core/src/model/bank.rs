use thiserror::Error;

use crate::model::options::AnswerOption;
use crate::model::question::{Question, QuestionError, QuestionRecord};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("dataset contains no questions")]
    Empty,

    #[error("no answer options configured")]
    NoOptions,

    #[error("invalid question at index {index}: {source}")]
    Question {
        index: usize,
        source: QuestionError,
    },

    #[error("dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// Ordered, immutable bank of study questions plus the answer options
/// offered for every question.
///
/// Loaded once at startup from the pre-validated JSON dataset artifact;
/// the CSV-to-JSON conversion is a build-time step outside this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBank {
    questions: Vec<Question>,
    options: Vec<AnswerOption>,
}

impl QuestionBank {
    /// Build a bank from already-validated questions and an option set.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` if `questions` is empty and
    /// `BankError::NoOptions` if `options` is empty.
    pub fn new(
        questions: Vec<Question>,
        options: Vec<AnswerOption>,
    ) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        if options.is_empty() {
            return Err(BankError::NoOptions);
        }
        Ok(Self { questions, options })
    }

    /// Load a bank from the JSON dataset artifact, offering the default
    /// causal-level options.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Parse` for malformed JSON, `BankError::Question`
    /// for a record failing validation, and `BankError::Empty` for an
    /// empty dataset.
    pub fn from_json_str(data: &str) -> Result<Self, BankError> {
        let records: Vec<QuestionRecord> = serde_json::from_str(data)?;
        let mut questions = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let question = record
                .into_question()
                .map_err(|source| BankError::Question { index, source })?;
            questions.push(question);
        }
        Self::new(questions, AnswerOption::causal_levels())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Whether `key` is one of the offered answer options.
    #[must_use]
    pub fn has_option(&self, key: &str) -> bool {
        self.options.iter().any(|option| option.key() == key)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "Question": 1,
            "Example": "Coffee and memory",
            "Study Description": "A study of coffee intake and recall.",
            "Methodology1": "Participants were surveyed.",
            "Methodology2": "Recall was measured twice.",
            "Results1": "Higher intake correlated with recall.",
            "Results2": "",
            "Level of Explanation": "Causal - Tests whether changes in one variable causally contribute to changes in another variable."
        },
        {
            "Question": "2",
            "Example": "Sleep and mood",
            "Study Description": "A diary study of sleep and mood.",
            "Methodology1": "Daily surveys for six weeks.",
            "Methodology2": "",
            "Results1": "Mood tracked sleep quality.",
            "Results2": "",
            "Level of Explanation": "Inferential - Tests whether an association between two variables is likely to apply beyond the sample at hand."
        }
    ]"#;

    #[test]
    fn loads_dataset_and_preserves_order() {
        let bank = QuestionBank::from_json_str(SAMPLE).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.question(0).unwrap().example(), "Coffee and memory");
        assert_eq!(bank.question(1).unwrap().number(), "2");
        assert!(bank.question(2).is_none());
    }

    #[test]
    fn default_options_are_offered() {
        let bank = QuestionBank::from_json_str(SAMPLE).unwrap();
        assert_eq!(bank.options().len(), 3);
        assert!(bank.has_option(bank.question(0).unwrap().level_of_explanation()));
        assert!(!bank.has_option("Mechanistic"));
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let err = QuestionBank::from_json_str("[]").unwrap_err();
        assert!(matches!(err, BankError::Empty));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = QuestionBank::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, BankError::Parse(_)));
    }

    #[test]
    fn invalid_record_reports_its_index() {
        let json = r#"[
            {
                "Question": 1,
                "Example": "",
                "Study Description": "desc",
                "Level of Explanation": "label"
            }
        ]"#;
        let err = QuestionBank::from_json_str(json).unwrap_err();
        assert!(matches!(err, BankError::Question { index: 0, .. }));
    }
}
