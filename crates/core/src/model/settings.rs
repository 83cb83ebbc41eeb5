use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("exam size must be > 0")]
    InvalidExamSize,

    #[error("custom time limit must be > 0 seconds")]
    InvalidTimeLimit,

    #[error("unknown time limit {0:?} (expected 15, 30, 60, unlimited or <seconds>s)")]
    UnknownTimeLimit(String),

    #[error("scoring weights must be finite")]
    NonFiniteWeight,

    #[error("correct answer weight must be > 0, got {0}")]
    InvalidCorrectWeight(f64),

    #[error("special question probability must be in [0, 1], got {0}")]
    InvalidProbability(f64),
}

//
// ─── TIME LIMIT ────────────────────────────────────────────────────────────────
//

/// Time allowed for one attempt.
///
/// The menu offered to users is [`TimeLimit::MENU`]; `Custom` exists for hosts
/// and tests that need other spans; its length is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeLimit {
    Minutes15,
    Minutes30,
    Minutes60,
    #[default]
    Unlimited,
    Custom { seconds: NonZeroU32 },
}

impl TimeLimit {
    pub const MENU: [TimeLimit; 4] = [
        TimeLimit::Minutes15,
        TimeLimit::Minutes30,
        TimeLimit::Minutes60,
        TimeLimit::Unlimited,
    ];

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLimit` for zero seconds.
    pub fn custom(seconds: u32) -> Result<Self, SettingsError> {
        NonZeroU32::new(seconds)
            .map(|seconds| Self::Custom { seconds })
            .ok_or(SettingsError::InvalidTimeLimit)
    }

    /// Length of the limit, or `None` when unlimited.
    #[must_use]
    pub fn duration(self) -> Option<Duration> {
        match self {
            TimeLimit::Minutes15 => Some(Duration::minutes(15)),
            TimeLimit::Minutes30 => Some(Duration::minutes(30)),
            TimeLimit::Minutes60 => Some(Duration::minutes(60)),
            TimeLimit::Unlimited => None,
            TimeLimit::Custom { seconds } => Some(Duration::seconds(i64::from(seconds.get()))),
        }
    }

    #[must_use]
    pub fn is_unlimited(self) -> bool {
        matches!(self, TimeLimit::Unlimited)
    }
}

impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLimit::Minutes15 => f.write_str("15 min"),
            TimeLimit::Minutes30 => f.write_str("30 min"),
            TimeLimit::Minutes60 => f.write_str("60 min"),
            TimeLimit::Unlimited => f.write_str("unlimited"),
            TimeLimit::Custom { seconds } => write!(f, "{seconds} s"),
        }
    }
}

impl FromStr for TimeLimit {
    type Err = SettingsError;

    /// Accepts `15`, `30`, `60` (optionally suffixed `m`/`min`), `unlimited`/`none`,
    /// or `<n>s` for a custom span in seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        let minutes = raw
            .strip_suffix("min")
            .or_else(|| raw.strip_suffix('m'))
            .unwrap_or(&raw)
            .trim();
        match minutes {
            "15" => return Ok(TimeLimit::Minutes15),
            "30" => return Ok(TimeLimit::Minutes30),
            "60" => return Ok(TimeLimit::Minutes60),
            "unlimited" | "none" | "off" => return Ok(TimeLimit::Unlimited),
            _ => {}
        }
        raw.strip_suffix('s')
            .and_then(|secs| secs.trim().parse::<u32>().ok())
            .ok_or_else(|| SettingsError::UnknownTimeLimit(s.to_owned()))
            .and_then(TimeLimit::custom)
    }
}

//
// ─── SCORING WEIGHTS ───────────────────────────────────────────────────────────
//

/// Points awarded per verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    correct: f64,
    incorrect: f64,
    skipped: f64,
}

impl ScoringWeights {
    /// # Errors
    ///
    /// Returns `SettingsError` if any weight is not finite or `correct <= 0`.
    pub fn new(correct: f64, incorrect: f64, skipped: f64) -> Result<Self, SettingsError> {
        if !(correct.is_finite() && incorrect.is_finite() && skipped.is_finite()) {
            return Err(SettingsError::NonFiniteWeight);
        }
        if correct <= 0.0 {
            return Err(SettingsError::InvalidCorrectWeight(correct));
        }
        Ok(Self {
            correct,
            incorrect,
            skipped,
        })
    }

    #[must_use]
    pub fn correct(&self) -> f64 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> f64 {
        self.incorrect
    }

    #[must_use]
    pub fn skipped(&self) -> f64 {
        self.skipped
    }
}

impl Default for ScoringWeights {
    /// +1 for a correct answer, -0.5 for a wrong one, 0 for a skipped question.
    fn default() -> Self {
        Self {
            correct: 1.0,
            incorrect: -0.5,
            skipped: 0.0,
        }
    }
}

//
// ─── SPECIAL QUESTION ──────────────────────────────────────────────────────────
//

/// Configuration of the rare special-question injection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialQuestionSettings {
    sentinel_id: QuestionId,
    probability: f64,
}

impl SpecialQuestionSettings {
    pub const DEFAULT_SENTINEL: u64 = 999;
    pub const DEFAULT_PROBABILITY: f64 = 1.0 / 3.0;

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidProbability` unless `probability` is in `[0, 1]`.
    pub fn new(sentinel_id: QuestionId, probability: f64) -> Result<Self, SettingsError> {
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(SettingsError::InvalidProbability(probability));
        }
        Ok(Self {
            sentinel_id,
            probability,
        })
    }

    #[must_use]
    pub fn sentinel_id(&self) -> QuestionId {
        self.sentinel_id
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for SpecialQuestionSettings {
    fn default() -> Self {
        Self {
            sentinel_id: QuestionId::new(Self::DEFAULT_SENTINEL),
            probability: Self::DEFAULT_PROBABILITY,
        }
    }
}

//
// ─── EXAM SETTINGS ─────────────────────────────────────────────────────────────
//

/// Everything configurable about an exam attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamSettings {
    exam_size: u32,
    time_limit: TimeLimit,
    scoring: ScoringWeights,
    special: Option<SpecialQuestionSettings>,
}

impl ExamSettings {
    pub const DEFAULT_EXAM_SIZE: u32 = 30;

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidExamSize` if `exam_size` is zero.
    pub fn new(
        exam_size: u32,
        time_limit: TimeLimit,
        scoring: ScoringWeights,
        special: Option<SpecialQuestionSettings>,
    ) -> Result<Self, SettingsError> {
        if exam_size == 0 {
            return Err(SettingsError::InvalidExamSize);
        }
        Ok(Self {
            exam_size,
            time_limit,
            scoring,
            special,
        })
    }

    #[must_use]
    pub fn exam_size(&self) -> u32 {
        self.exam_size
    }

    #[must_use]
    pub fn time_limit(&self) -> TimeLimit {
        self.time_limit
    }

    #[must_use]
    pub fn scoring(&self) -> ScoringWeights {
        self.scoring
    }

    #[must_use]
    pub fn special(&self) -> Option<SpecialQuestionSettings> {
        self.special
    }

    #[must_use]
    pub fn with_time_limit(mut self, time_limit: TimeLimit) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Human-readable rules shown before an exam starts.
    #[must_use]
    pub fn instructions(&self) -> String {
        let weights = self.scoring;
        format!(
            "Questions: {size} multiple-choice questions drawn at random from the bank.\n\
             Answers: pick one option letter (A, B, C, ...) per question, or skip it.\n\
             Scoring: correct {correct:+}, incorrect {incorrect:+}, skipped {skipped:+}.\n\
             Time limit: {limit}.",
            size = self.exam_size,
            correct = weights.correct(),
            incorrect = weights.incorrect(),
            skipped = weights.skipped(),
            limit = self.time_limit,
        )
    }
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            exam_size: Self::DEFAULT_EXAM_SIZE,
            time_limit: TimeLimit::Unlimited,
            scoring: ScoringWeights::default(),
            special: Some(SpecialQuestionSettings::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = ExamSettings::default();
        assert_eq!(settings.exam_size(), 30);
        assert_eq!(settings.time_limit(), TimeLimit::Unlimited);
        assert_eq!(settings.scoring().incorrect(), -0.5);
        let special = settings.special().unwrap();
        assert!((special.probability() - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_exam_size_is_rejected() {
        let err = ExamSettings::new(0, TimeLimit::Unlimited, ScoringWeights::default(), None)
            .unwrap_err();
        assert_eq!(err, SettingsError::InvalidExamSize);
    }

    #[test]
    fn weights_are_validated() {
        assert!(ScoringWeights::new(1.0, -1.0, 0.0).is_ok());
        assert_eq!(
            ScoringWeights::new(0.0, -1.0, 0.0).unwrap_err(),
            SettingsError::InvalidCorrectWeight(0.0)
        );
        assert_eq!(
            ScoringWeights::new(1.0, f64::NAN, 0.0).unwrap_err(),
            SettingsError::NonFiniteWeight
        );
    }

    #[test]
    fn probability_must_be_a_probability() {
        assert!(SpecialQuestionSettings::new(QuestionId::new(1), 1.0).is_ok());
        assert!(SpecialQuestionSettings::new(QuestionId::new(1), 1.5).is_err());
        assert!(SpecialQuestionSettings::new(QuestionId::new(1), -0.1).is_err());
    }

    #[test]
    fn time_limit_parses_menu_and_custom_values() {
        assert_eq!("15".parse::<TimeLimit>().unwrap(), TimeLimit::Minutes15);
        assert_eq!("30m".parse::<TimeLimit>().unwrap(), TimeLimit::Minutes30);
        assert_eq!("60 min".parse::<TimeLimit>().unwrap(), TimeLimit::Minutes60);
        assert_eq!("Unlimited".parse::<TimeLimit>().unwrap(), TimeLimit::Unlimited);
        assert_eq!(
            "90s".parse::<TimeLimit>().unwrap(),
            TimeLimit::custom(90).unwrap()
        );
        assert_eq!(TimeLimit::custom(0), Err(SettingsError::InvalidTimeLimit));
        assert!("0s".parse::<TimeLimit>().is_err());
        assert!("soon".parse::<TimeLimit>().is_err());
    }

    #[test]
    fn time_limit_durations() {
        assert_eq!(TimeLimit::Minutes15.duration(), Some(Duration::minutes(15)));
        assert_eq!(TimeLimit::Unlimited.duration(), None);
        assert_eq!(
            TimeLimit::custom(1).unwrap().duration(),
            Some(Duration::seconds(1))
        );
        assert_eq!(TimeLimit::MENU.len(), 4);
    }

    #[test]
    fn instructions_mention_size_scoring_and_limit() {
        let text = ExamSettings::default()
            .with_time_limit(TimeLimit::Minutes30)
            .instructions();
        assert!(text.contains("30 multiple-choice"));
        assert!(text.contains("incorrect -0.5"));
        assert!(text.contains("30 min"));
        assert!(text.contains("option letter (A, B, C"));
    }
}
