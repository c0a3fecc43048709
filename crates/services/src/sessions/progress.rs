/// Aggregated view of session progress, useful for front-ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub current: usize,
    pub is_reviewing: bool,
}
