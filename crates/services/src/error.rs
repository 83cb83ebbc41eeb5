//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{AnswerChoice, AttemptError, LifecycleState, SettingsError};
use exam_core::scoring::ScoreError;
use exam_storage::StorageError;

use crate::sessions::ExamEvent;

/// Errors emitted by exam sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question bank has {available} questions but the exam needs {requested}")]
    InsufficientBank { available: usize, requested: usize },
    #[error("answer {answer} is not an option of question {}", .index + 1)]
    InvalidAnswer { index: usize, answer: AnswerChoice },
    #[error("cannot {event} while the exam is {state}")]
    InvalidTransition {
        event: ExamEvent,
        state: LifecycleState,
    },
    #[error("exam is not finished yet")]
    NotFinished,
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// True for events that do not apply in the current state.
    ///
    /// Hosts can treat these as no-ops.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, SessionError::InvalidTransition { .. })
    }
}
