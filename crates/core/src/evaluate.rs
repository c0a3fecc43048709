//! Pure answer evaluation.
//!
//! Side-effect free so it is safe to call while rendering.

use crate::model::{MIN_REASONING_CHARS, Question, ResponseDraft};

/// Whether `option` matches the question's ground-truth label.
///
/// Exact, case-sensitive string equality; no partial credit, no fuzzy
/// matching.
#[must_use]
pub fn is_correct(question: &Question, option: &str) -> bool {
    option == question.level_of_explanation()
}

/// The forward-transition gate: the draft selects the correct option and
/// carries at least [`MIN_REASONING_CHARS`] characters of reasoning.
///
/// Length counts Unicode scalar values.
#[must_use]
pub fn meets_answer_gate(question: &Question, draft: &ResponseDraft) -> bool {
    draft
        .selected()
        .is_some_and(|selected| is_correct(question, selected))
        && draft.reasoning().chars().count() >= MIN_REASONING_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerOption;

    fn build_question(level: &str) -> Question {
        Question::new(
            "1",
            "Coffee and memory",
            "A study of coffee intake and recall.",
            "",
            "",
            "",
            "",
            level,
        )
        .unwrap()
    }

    #[test]
    fn ground_truth_is_correct_and_everything_else_is_not() {
        for option in AnswerOption::causal_levels() {
            let question = build_question(option.key());
            assert!(is_correct(&question, option.key()));
            for other in AnswerOption::causal_levels() {
                if other.key() != option.key() {
                    assert!(!is_correct(&question, other.key()));
                }
            }
        }
    }

    #[test]
    fn equality_is_case_sensitive() {
        let question = build_question("Causal - Tests whether changes in one variable causally contribute to changes in another variable.");
        assert!(!is_correct(
            &question,
            "causal - tests whether changes in one variable causally contribute to changes in another variable."
        ));
    }

    #[test]
    fn gate_needs_correct_option_and_long_enough_reasoning() {
        let question = build_question("Causal - Tests whether changes in one variable causally contribute to changes in another variable.");
        let mut draft = ResponseDraft::new();
        assert!(!meets_answer_gate(&question, &draft));

        draft.select(question.level_of_explanation());
        draft.set_reasoning("too short");
        assert!(!meets_answer_gate(&question, &draft));

        draft.set_reasoning("randomized assignment was used");
        assert!(meets_answer_gate(&question, &draft));

        draft.select("Inferential - Tests whether an association between two variables is likely to apply beyond the sample at hand.");
        assert!(!meets_answer_gate(&question, &draft));
    }

    #[test]
    fn gate_counts_characters_not_bytes() {
        let question = build_question("Causal - Tests whether changes in one variable causally contribute to changes in another variable.");
        let mut draft = ResponseDraft::new();
        draft.select(question.level_of_explanation());
        draft.set_reasoning("причинний"); // 9 chars, 18 bytes
        assert!(!meets_answer_gate(&question, &draft));
        draft.set_reasoning("причинний!");
        assert!(meets_answer_gate(&question, &draft));
    }
}
