use thiserror::Error;

use crate::model::{AnswerChoice, ExamAttempt, OptionKey, ScoringWeights};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("attempt must be finished before it can be scored")]
    NotFinished,
}

//
// ─── VERDICTS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    Skipped,
}

/// Feedback for one question of a finished attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionFeedback {
    pub index: usize,
    pub prompt: String,
    pub answer: AnswerChoice,
    /// Text of the chosen option; `None` when skipped or the key is unknown.
    pub answer_text: Option<String>,
    pub correct_option: OptionKey,
    /// `None` only if the record's correct key is missing from its options.
    pub correct_text: Option<String>,
    pub verdict: Verdict,
    pub points: f64,
}

/// Result of scoring a finished attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub total: f64,
    pub correct: u32,
    pub incorrect: u32,
    pub skipped: u32,
    pub details: Vec<QuestionFeedback>,
}

impl ScoreReport {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.details.len()
    }

    /// Best possible total for this attempt under `weights`.
    #[must_use]
    pub fn max_total(&self, weights: ScoringWeights) -> f64 {
        weights.correct() * self.details.len() as f64
    }
}

//
// ─── SCORER ────────────────────────────────────────────────────────────────────
//

/// Turns a finished attempt into a `ScoreReport`.
///
/// Scoring is a pure function of the attempt and the weights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    #[must_use]
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    /// # Errors
    ///
    /// Returns `ScoreError::NotFinished` unless the attempt has been finished.
    pub fn score(&self, attempt: &ExamAttempt) -> Result<ScoreReport, ScoreError> {
        if !attempt.is_finished() {
            return Err(ScoreError::NotFinished);
        }

        let mut report = ScoreReport {
            total: 0.0,
            correct: 0,
            incorrect: 0,
            skipped: 0,
            details: Vec::with_capacity(attempt.len()),
        };

        for (index, (question, answer)) in attempt
            .questions()
            .iter()
            .zip(attempt.answers())
            .enumerate()
        {
            // A key missing from the options (or a record whose correct key is
            // missing) can never be correct.
            let verdict = match answer {
                AnswerChoice::Skipped => Verdict::Skipped,
                AnswerChoice::Option(key)
                    if key == question.correct_option() && question.has_option(key) =>
                {
                    Verdict::Correct
                }
                AnswerChoice::Option(_) => Verdict::Incorrect,
            };
            let points = match verdict {
                Verdict::Correct => {
                    report.correct += 1;
                    self.weights.correct()
                }
                Verdict::Incorrect => {
                    report.incorrect += 1;
                    self.weights.incorrect()
                }
                Verdict::Skipped => {
                    report.skipped += 1;
                    self.weights.skipped()
                }
            };
            report.total += points;

            report.details.push(QuestionFeedback {
                index,
                prompt: question.prompt().to_owned(),
                answer: answer.clone(),
                answer_text: answer
                    .key()
                    .and_then(|key| question.option_text(key))
                    .map(str::to_owned),
                correct_option: question.correct_option().clone(),
                correct_text: question.correct_text().map(str::to_owned),
                verdict,
                points,
            });
        }

        Ok(report)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
