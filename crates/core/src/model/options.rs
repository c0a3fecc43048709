//
// ─── ANSWER OPTIONS ────────────────────────────────────────────────────────────
//

/// One selectable classification, as offered to the user.
///
/// The `key` is the full label string stored in the dataset's ground-truth
/// field; correctness is exact string equality on it. `title` and
/// `description` are the split presentation of the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    key: String,
    title: String,
    description: String,
}

impl AnswerOption {
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The three causal-level options used by the default dataset.
    ///
    /// Keys are verbatim from the dataset, including the double space in
    /// the Exploratory key; the ground-truth column matches them exactly.
    #[must_use]
    pub fn causal_levels() -> Vec<AnswerOption> {
        vec![
            AnswerOption::new(
                "Exploratory -  Searches for phenomena or correlations but does not or cannot test whether a relationship may be spurious.",
                "Exploratory",
                "Searches for phenomena or correlations but does not or cannot test whether a relationship may be spurious.",
            ),
            AnswerOption::new(
                "Inferential - Tests whether an association between two variables is likely to apply beyond the sample at hand.",
                "Inferential",
                "Tests whether an association between two variables is likely to apply beyond the sample at hand.",
            ),
            AnswerOption::new(
                "Causal - Tests whether changes in one variable causally contribute to changes in another variable.",
                "Causal",
                "Tests whether changes in one variable causally contribute to changes in another variable.",
            ),
        ]
    }
}

//
// ─── DISPLAY ORDER ─────────────────────────────────────────────────────────────
//

/// Deterministic presentation order for the options of one question.
///
/// Seeded linear congruential shuffle: seed = index·9301 + 49297, modulus
/// 233280. The same question index always yields the same permutation, so
/// option order is stable across renders and sessions without any stored
/// state.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn display_order(question_index: usize, count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..count).collect();
    if count < 2 {
        return order;
    }

    let seed = question_index as u64 * 9301 + 49297;
    for i in (1..count).rev() {
        let step = (seed * (i as u64 + 1)) % 233_280;
        let random = step as f64 / 233_280.0;
        let j = (random * (i + 1) as f64) as usize;
        order.swap(i, j);
    }
    order
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
