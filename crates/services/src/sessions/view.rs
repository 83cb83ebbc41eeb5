use chrono::{DateTime, Utc};

use exam_core::Remaining;
use exam_core::model::{AnswerChoice, ExamAttempt, QuestionRecord};

use super::progress::ExamProgress;

/// What a host needs to render the question on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptSnapshot<'a> {
    pub index: usize,
    pub total: usize,
    pub question: &'a QuestionRecord,
    pub answer: &'a AnswerChoice,
    pub remaining: Remaining,
    pub progress: ExamProgress,
}

impl<'a> AttemptSnapshot<'a> {
    #[must_use]
    pub fn from_attempt(attempt: &'a ExamAttempt, now: DateTime<Utc>) -> Self {
        Self {
            index: attempt.current_index(),
            total: attempt.len(),
            question: attempt.current_question(),
            answer: attempt.current_answer(),
            remaining: attempt.remaining(now),
            progress: ExamProgress::from_attempt(attempt),
        }
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}
