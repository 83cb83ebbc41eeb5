use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use exam_core::model::{ExamSettings, QuestionBank, QuestionId, QuestionRecord, SpecialQuestionSettings};

use crate::error::SessionError;

/// Questions drawn for one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePlan {
    pub questions: Vec<QuestionRecord>,
    pub special_included: bool,
}

impl SamplePlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }
}

/// Rare injection of a designated question into an attempt.
///
/// The record whose id equals `sentinel_id` never enters the normal pool. With
/// probability `probability` an attempt swaps one normal slot for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialQuestionRule {
    sentinel_id: QuestionId,
    probability: f64,
}

impl SpecialQuestionRule {
    #[must_use]
    pub fn new(settings: SpecialQuestionSettings) -> Self {
        Self {
            sentinel_id: settings.sentinel_id(),
            probability: settings.probability(),
        }
    }

    #[must_use]
    pub fn sentinel_id(&self) -> QuestionId {
        self.sentinel_id
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    fn is_special(&self, question: &QuestionRecord) -> bool {
        question.id() == Some(self.sentinel_id)
    }
}

/// Draws questions for an attempt: uniform, without replacement, shuffled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sampler {
    special: Option<SpecialQuestionRule>,
}

impl Sampler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_settings(settings: &ExamSettings) -> Self {
        Self {
            special: settings.special().map(SpecialQuestionRule::new),
        }
    }

    /// Enable (or replace) the special-question rule.
    #[must_use]
    pub fn with_special(mut self, rule: SpecialQuestionRule) -> Self {
        self.special = Some(rule);
        self
    }

    #[must_use]
    pub fn without_special(mut self) -> Self {
        self.special = None;
        self
    }

    #[must_use]
    pub fn special(&self) -> Option<SpecialQuestionRule> {
        self.special
    }

    /// Select `n` distinct questions from `bank`.
    ///
    /// The special-question decision is made once per call. When the bank holds
    /// exactly `n` records including the special one, the special question is
    /// always part of the draw.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InsufficientBank` if the bank has fewer than `n` records.
    pub fn select<R: Rng>(
        &self,
        bank: &QuestionBank,
        n: usize,
        rng: &mut R,
    ) -> Result<SamplePlan, SessionError> {
        if bank.len() < n {
            return Err(SessionError::InsufficientBank {
                available: bank.len(),
                requested: n,
            });
        }

        let (special, pool): (Option<&QuestionRecord>, Vec<&QuestionRecord>) = match self.special {
            Some(rule) => {
                let special = bank.records().iter().find(|q| rule.is_special(q));
                let pool = bank.records().iter().filter(|q| !rule.is_special(q)).collect();
                (special, pool)
            }
            None => (None, bank.records().iter().collect()),
        };

        let include_special = match (special, self.special) {
            (Some(_), Some(rule)) if n > 0 => pool.len() < n || rng.random_bool(rule.probability),
            _ => false,
        };

        let normal_count = if include_special { n - 1 } else { n };
        let mut questions: Vec<QuestionRecord> = pool
            .choose_multiple(rng, normal_count)
            .map(|q| (*q).clone())
            .collect();
        if include_special {
            questions.extend(special.cloned());
        }
        questions.shuffle(rng);

        Ok(SamplePlan {
            questions,
            special_included: include_special,
        })
    }
}
