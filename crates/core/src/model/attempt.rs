use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::question::{AnswerChoice, QuestionRecord};
use crate::timer::{Remaining, Timer};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("an attempt needs at least one question")]
    NoQuestions,

    #[error("attempt is already finished")]
    Finished,

    #[error("answer {answer} is not an option of question {index}")]
    InvalidAnswer { index: usize, answer: AnswerChoice },
}

//
// ─── LIFECYCLE ─────────────────────────────────────────────────────────────────
//

/// Lifecycle of the exam as seen by hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    InProgress,
    Finished,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Idle => f.write_str("idle"),
            LifecycleState::InProgress => f.write_str("in progress"),
            LifecycleState::Finished => f.write_str("finished"),
        }
    }
}

/// How an attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Submitted,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub at: DateTime<Utc>,
    pub reason: FinishReason,
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// One user's pass through a sampled set of questions.
///
/// Answers stay mutable until `finish` is called; after that every mutator
/// returns `AttemptError::Finished`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamAttempt {
    questions: Vec<QuestionRecord>,
    answers: Vec<AnswerChoice>,
    current_index: usize,
    timer: Timer,
    completion: Option<Completion>,
}

impl ExamAttempt {
    /// Starts an attempt over `questions` with every answer skipped.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NoQuestions` if `questions` is empty.
    pub fn new(questions: Vec<QuestionRecord>, timer: Timer) -> Result<Self, AttemptError> {
        if questions.is_empty() {
            return Err(AttemptError::NoQuestions);
        }
        let answers = vec![AnswerChoice::Skipped; questions.len()];
        Ok(Self {
            questions,
            answers,
            current_index: 0,
            timer,
            completion: None,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerChoice] {
        &self.answers
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
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> &QuestionRecord {
        &self.questions[self.current_index]
    }

    #[must_use]
    pub fn current_answer(&self) -> &AnswerChoice {
        &self.answers[self.current_index]
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&AnswerChoice> {
        self.answers.get(index)
    }

    #[must_use]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.timer.started_at()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.timer.deadline()
    }

    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Remaining {
        self.timer.remaining(now)
    }

    #[must_use]
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completion.is_some()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// Number of questions holding an option rather than `Skipped`.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| !a.is_skipped()).count()
    }

    /// Records `choice` for the current question, replacing any earlier answer.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Finished` after completion and
    /// `AttemptError::InvalidAnswer` if the option does not exist on the question.
    pub fn select_answer(&mut self, choice: AnswerChoice) -> Result<(), AttemptError> {
        self.ensure_open()?;
        let index = self.current_index;
        if !self.questions[index].accepts(&choice) {
            return Err(AttemptError::InvalidAnswer {
                index,
                answer: choice,
            });
        }
        self.answers[index] = choice;
        Ok(())
    }

    /// Moves to the next question. Returns `Ok(false)` at the last question.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Finished` after completion.
    pub fn advance(&mut self) -> Result<bool, AttemptError> {
        self.ensure_open()?;
        if self.is_last() {
            return Ok(false);
        }
        self.current_index += 1;
        Ok(true)
    }

    /// Moves to the previous question. Returns `Ok(false)` at the first question.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Finished` after completion.
    pub fn retreat(&mut self) -> Result<bool, AttemptError> {
        self.ensure_open()?;
        if self.current_index == 0 {
            return Ok(false);
        }
        self.current_index -= 1;
        Ok(true)
    }

    /// Freezes the attempt.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Finished` if it was already frozen.
    pub fn finish(&mut self, at: DateTime<Utc>, reason: FinishReason) -> Result<(), AttemptError> {
        self.ensure_open()?;
        self.completion = Some(Completion { at, reason });
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), AttemptError> {
        if self.is_finished() {
            return Err(AttemptError::Finished);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn force_answer(&mut self, index: usize, choice: AnswerChoice) {
        self.answers[index] = choice;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
