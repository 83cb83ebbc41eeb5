use chrono::{DateTime, Duration, Utc};

use exam_core::Clock;
use exam_core::Remaining;
use exam_core::model::{AnswerChoice, ExamSettings, FinishReason, QuestionBank};
use exam_core::scoring::ScoreReport;
use exam_storage::QuestionBankRepository;

use super::service::{ExamSession, TickOutcome};
use super::view::AttemptSnapshot;
use crate::error::SessionError;

/// Drives one exam session against a loaded bank, stamping every event with the
/// service clock.
#[derive(Debug, Clone)]
pub struct ExamLoopService {
    clock: Clock,
    bank: QuestionBank,
    session: ExamSession,
}

impl ExamLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: QuestionBank, settings: ExamSettings) -> Self {
        Self {
            clock,
            bank,
            session: ExamSession::new(settings),
        }
    }

    /// Load the bank from `repo` and build an idle session over it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the bank cannot be loaded.
    pub async fn load(
        repo: &dyn QuestionBankRepository,
        clock: Clock,
        settings: ExamSettings,
    ) -> Result<Self, SessionError> {
        let bank = repo.load_bank().await?;
        let size = usize::try_from(settings.exam_size()).unwrap_or(usize::MAX);
        if bank.len() < size {
            tracing::warn!(
                available = bank.len(),
                requested = size,
                "question bank is smaller than the exam"
            );
        }
        Ok(Self::new(clock, bank, settings))
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Moves a fixed clock forward; no effect on the system clock.
    pub fn advance_clock(&mut self, delta: Duration) {
        self.clock.advance(delta);
    }

    /// # Errors
    ///
    /// See [`ExamSession::start`].
    pub fn start(&mut self) -> Result<(), SessionError> {
        let now = self.now();
        self.session.start(&self.bank, now)
    }

    /// # Errors
    ///
    /// See [`ExamSession::select_answer`].
    pub fn answer(&mut self, choice: AnswerChoice) -> Result<(), SessionError> {
        let now = self.now();
        self.session.select_answer(choice, now)
    }

    /// # Errors
    ///
    /// See [`ExamSession::next`].
    pub fn next(&mut self) -> Result<usize, SessionError> {
        let now = self.now();
        self.session.next(now)
    }

    /// # Errors
    ///
    /// See [`ExamSession::previous`].
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        let now = self.now();
        self.session.previous(now)
    }

    /// # Errors
    ///
    /// See [`ExamSession::submit`].
    pub fn submit(&mut self) -> Result<FinishReason, SessionError> {
        let now = self.now();
        self.session.submit(now)
    }

    pub fn tick(&mut self) -> TickOutcome {
        let now = self.now();
        self.session.tick(now)
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Discard the current attempt and start a fresh one with a new draw.
    ///
    /// # Errors
    ///
    /// See [`ExamSession::start`].
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.session.reset();
        self.start()
    }

    /// # Errors
    ///
    /// See [`ExamSession::score`].
    pub fn score(&self) -> Result<ScoreReport, SessionError> {
        self.session.score()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<AttemptSnapshot<'_>> {
        self.session.snapshot(self.now())
    }

    #[must_use]
    pub fn remaining(&self) -> Option<Remaining> {
        self.session.remaining(self.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{LifecycleState, QuestionRecord, ScoringWeights, TimeLimit};
    use exam_core::time::fixed_clock;

    fn bank(n: usize) -> QuestionBank {
        let records = (0..n)
            .map(|i| {
                QuestionRecord::new(None, format!("Q{i}"), [("A", "a"), ("B", "b")], "B").unwrap()
            })
            .collect();
        QuestionBank::new(records).unwrap()
    }

    #[test]
    fn clock_drives_expiry() {
        let settings =
            ExamSettings::new(2, TimeLimit::Minutes15, ScoringWeights::default(), None).unwrap();
        let mut svc = ExamLoopService::new(fixed_clock(), bank(4), settings);
        svc.start().unwrap();
        assert_eq!(svc.remaining(), Some(Remaining::Finite(Duration::minutes(15))));

        svc.advance_clock(Duration::minutes(16));
        assert_eq!(svc.tick(), TickOutcome::Expired);
        assert_eq!(svc.session().lifecycle(), LifecycleState::Finished);
        assert!(svc.remaining().is_none());
    }

    #[test]
    fn restart_draws_a_new_attempt() {
        let settings =
            ExamSettings::new(30, TimeLimit::Unlimited, ScoringWeights::default(), None).unwrap();
        let mut svc = ExamLoopService::new(fixed_clock(), bank(200), settings);
        let prompts = |svc: &ExamLoopService| -> Vec<String> {
            svc.session()
                .attempt()
                .unwrap()
                .questions()
                .iter()
                .map(|q| q.prompt().to_owned())
                .collect()
        };
        svc.start().unwrap();
        let first = prompts(&svc);
        svc.answer(AnswerChoice::parse("B").unwrap()).unwrap();
        svc.submit().unwrap();

        svc.restart().unwrap();
        assert_eq!(svc.session().lifecycle(), LifecycleState::InProgress);
        assert_eq!(svc.session().progress().unwrap().answered, 0);
        assert_ne!(prompts(&svc), first);
    }
}
