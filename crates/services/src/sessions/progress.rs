use exam_core::model::ExamAttempt;

/// Aggregated view of attempt progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub skipped: usize,
    /// Zero-based index of the question on screen.
    pub current: usize,
    pub is_complete: bool,
}

impl ExamProgress {
    #[must_use]
    pub fn from_attempt(attempt: &ExamAttempt) -> Self {
        let answered = attempt.answered_count();
        Self {
            total: attempt.len(),
            answered,
            skipped: attempt.len() - answered,
            current: attempt.current_index(),
            is_complete: attempt.is_finished(),
        }
    }
}
