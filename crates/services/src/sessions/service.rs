use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;

use exam_core::model::{
    AnswerChoice, AttemptError, ExamAttempt, ExamSettings, FinishReason, LifecycleState,
    QuestionBank,
};
use exam_core::scoring::{ScoreReport, Scorer};
use exam_core::{Remaining, Timer};

use super::plan::Sampler;
use super::progress::ExamProgress;
use super::view::AttemptSnapshot;
use crate::error::SessionError;

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// UI events routed into an `ExamSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamEvent {
    Start,
    SelectAnswer,
    Next,
    Previous,
    Submit,
}

impl fmt::Display for ExamEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExamEvent::Start => "start",
            ExamEvent::SelectAnswer => "select an answer",
            ExamEvent::Next => "go to the next question",
            ExamEvent::Previous => "go to the previous question",
            ExamEvent::Submit => "submit",
        };
        f.write_str(name)
    }
}

/// Result of polling the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Running(Remaining),
    /// The deadline passed on this tick and the attempt was finished.
    Expired,
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
enum SessionState {
    Idle,
    InProgress(ExamAttempt),
    Finished(ExamAttempt),
}

/// Exam lifecycle state machine.
///
/// Every event goes through one method here. Events that carry `now` check the
/// deadline first, so nothing is accepted once time has run out.
#[derive(Debug, Clone)]
pub struct ExamSession {
    settings: ExamSettings,
    sampler: Sampler,
    scorer: Scorer,
    state: SessionState,
}

impl ExamSession {
    #[must_use]
    pub fn new(settings: ExamSettings) -> Self {
        Self {
            sampler: Sampler::from_settings(&settings),
            scorer: Scorer::new(settings.scoring()),
            settings,
            state: SessionState::Idle,
        }
    }

    /// Replace the sampler built from settings.
    #[must_use]
    pub fn with_sampler(mut self, sampler: Sampler) -> Self {
        self.sampler = sampler;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &ExamSettings {
        &self.settings
    }

    #[must_use]
    pub fn lifecycle(&self) -> LifecycleState {
        match self.state {
            SessionState::Idle => LifecycleState::Idle,
            SessionState::InProgress(_) => LifecycleState::InProgress,
            SessionState::Finished(_) => LifecycleState::Finished,
        }
    }

    /// The live or finished attempt, `None` when idle.
    #[must_use]
    pub fn attempt(&self) -> Option<&ExamAttempt> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::InProgress(attempt) | SessionState::Finished(attempt) => Some(attempt),
        }
    }

    #[must_use]
    pub fn progress(&self) -> Option<ExamProgress> {
        self.attempt().map(ExamProgress::from_attempt)
    }

    /// Current question for rendering; only while in progress.
    #[must_use]
    pub fn snapshot(&self, now: DateTime<Utc>) -> Option<AttemptSnapshot<'_>> {
        match &self.state {
            SessionState::InProgress(attempt) => Some(AttemptSnapshot::from_attempt(attempt, now)),
            _ => None,
        }
    }

    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Remaining> {
        match &self.state {
            SessionState::InProgress(attempt) => Some(attempt.remaining(now)),
            _ => None,
        }
    }

    /// Start an attempt using the thread-local RNG.
    ///
    /// # Errors
    ///
    /// See [`ExamSession::start_with_rng`].
    pub fn start(&mut self, bank: &QuestionBank, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.start_with_rng(bank, now, &mut rand::rng())
    }

    /// Draw questions and move from `Idle` to `InProgress`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless idle and
    /// `SessionError::InsufficientBank` if the bank is smaller than the exam.
    pub fn start_with_rng<R: Rng>(
        &mut self,
        bank: &QuestionBank,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Idle) {
            return Err(self.reject(ExamEvent::Start));
        }

        let size = usize::try_from(self.settings.exam_size()).unwrap_or(usize::MAX);
        let plan = self.sampler.select(bank, size, rng).inspect_err(|err| {
            tracing::warn!(%err, "exam cannot start");
        })?;

        let special_included = plan.special_included;
        let timer = Timer::start(now, self.settings.time_limit());
        let attempt = ExamAttempt::new(plan.questions, timer)?;
        tracing::info!(
            questions = attempt.len(),
            special_included,
            time_limit = %self.settings.time_limit(),
            "exam started"
        );
        self.state = SessionState::InProgress(attempt);
        Ok(())
    }

    /// Record `choice` for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidAnswer` for an option the question does not
    /// offer (the stored answer is unchanged) and `SessionError::InvalidTransition`
    /// when no attempt is in progress, including when `now` is past the deadline.
    pub fn select_answer(
        &mut self,
        choice: AnswerChoice,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let attempt = self.in_progress(ExamEvent::SelectAnswer, now)?;
        let index = attempt.current_index();
        match attempt.select_answer(choice.clone()) {
            Ok(()) => {
                tracing::debug!(index, answer = %choice, "answer recorded");
                Ok(())
            }
            Err(AttemptError::InvalidAnswer { index, answer }) => {
                tracing::warn!(index, %answer, "rejected answer");
                Err(SessionError::InvalidAnswer { index, answer })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Move to the next question and return its index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` at the last question or when no
    /// attempt is in progress.
    pub fn next(&mut self, now: DateTime<Utc>) -> Result<usize, SessionError> {
        self.navigate(ExamEvent::Next, now)
    }

    /// Move to the previous question and return its index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` at the first question or when no
    /// attempt is in progress.
    pub fn previous(&mut self, now: DateTime<Utc>) -> Result<usize, SessionError> {
        self.navigate(ExamEvent::Previous, now)
    }

    fn navigate(&mut self, event: ExamEvent, now: DateTime<Utc>) -> Result<usize, SessionError> {
        let attempt = self.in_progress(event, now)?;
        let moved = match event {
            ExamEvent::Next => attempt.advance()?,
            _ => attempt.retreat()?,
        };
        let index = attempt.current_index();
        if !moved {
            tracing::debug!(index, %event, "navigation at boundary ignored");
            return Err(SessionError::InvalidTransition {
                event,
                state: LifecycleState::InProgress,
            });
        }
        tracing::debug!(index, "moved to question");
        Ok(index)
    }

    /// Finish the attempt.
    ///
    /// Returns `FinishReason::TimedOut` if the deadline had already passed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless an attempt is in progress.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<FinishReason, SessionError> {
        if self.expire_if_due(now) {
            return Ok(FinishReason::TimedOut);
        }
        if !matches!(self.state, SessionState::InProgress(_)) {
            return Err(self.reject(ExamEvent::Submit));
        }
        self.finish(now, FinishReason::Submitted)?;
        tracing::info!("exam submitted");
        Ok(FinishReason::Submitted)
    }

    /// Poll the timer. Idempotent; finishes the attempt once the deadline passes.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.expire_if_due(now) {
            return TickOutcome::Expired;
        }
        match &self.state {
            SessionState::Idle => TickOutcome::Idle,
            SessionState::InProgress(attempt) => TickOutcome::Running(attempt.remaining(now)),
            SessionState::Finished(_) => TickOutcome::Finished,
        }
    }

    /// Discard any attempt and return to `Idle`.
    pub fn reset(&mut self) {
        match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Idle => {}
            SessionState::InProgress(attempt) => {
                tracing::info!(questions = attempt.len(), "abandoned exam in progress");
            }
            SessionState::Finished(_) => tracing::info!("exam reset"),
        }
    }

    /// Score the finished attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` unless the attempt is finished.
    pub fn score(&self) -> Result<ScoreReport, SessionError> {
        match &self.state {
            SessionState::Finished(attempt) => Ok(self.scorer.score(attempt)?),
            _ => {
                tracing::error!(state = %self.lifecycle(), "score requested before exam finished");
                Err(SessionError::NotFinished)
            }
        }
    }

    fn in_progress(
        &mut self,
        event: ExamEvent,
        now: DateTime<Utc>,
    ) -> Result<&mut ExamAttempt, SessionError> {
        self.expire_if_due(now);
        let state = self.lifecycle();
        match &mut self.state {
            SessionState::InProgress(attempt) => Ok(attempt),
            _ => {
                tracing::warn!(%event, %state, "event does not apply");
                Err(SessionError::InvalidTransition { event, state })
            }
        }
    }

    fn reject(&self, event: ExamEvent) -> SessionError {
        let state = self.lifecycle();
        tracing::warn!(%event, %state, "event does not apply");
        SessionError::InvalidTransition { event, state }
    }

    /// Returns true if this call moved an expired attempt to `Finished`.
    fn expire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        let deadline = match &self.state {
            SessionState::InProgress(attempt) if attempt.timer().expired(now) => attempt.deadline(),
            _ => return false,
        };
        // The attempt ended at the deadline, not when the expiry was noticed.
        let at = deadline.map_or(now, |d| d.min(now));
        if self.finish(at, FinishReason::TimedOut).is_err() {
            return false;
        }
        tracing::info!(%at, "exam time expired");
        true
    }

    fn finish(&mut self, at: DateTime<Utc>, reason: FinishReason) -> Result<(), SessionError> {
        match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::InProgress(mut attempt) => {
                let result = attempt.finish(at, reason);
                self.state = SessionState::Finished(attempt);
                Ok(result?)
            }
            other => {
                self.state = other;
                Err(self.reject(ExamEvent::Submit))
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
