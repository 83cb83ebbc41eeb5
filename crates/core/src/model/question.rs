use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question must offer at least one option")]
    NoOptions,

    #[error("option key cannot be empty")]
    EmptyOptionKey,

    #[error("option key {0:?} is reserved")]
    ReservedOptionKey(String),

    #[error("option {key} has empty text")]
    EmptyOptionText { key: OptionKey },

    #[error("duplicate option key {key}")]
    DuplicateOption { key: OptionKey },

    #[error("correct option {key} is not one of the offered options")]
    UnknownCorrectOption { key: OptionKey },
}

//
// ─── OPTION KEY ────────────────────────────────────────────────────────────────
//

/// Letter (or short label) identifying one answer option, e.g. `"A"`.
///
/// Keys are trimmed and upper-cased so `"b"` and `" B "` name the same option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionKey(String);

impl OptionKey {
    /// Parses and normalizes an option key.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyOptionKey` for blank input and
    /// `QuestionError::ReservedOptionKey` for the skip sentinel.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, QuestionError> {
        let key = raw.as_ref().trim().to_uppercase();
        if key.is_empty() {
            return Err(QuestionError::EmptyOptionKey);
        }
        if key == AnswerChoice::SKIP_TOKEN {
            return Err(QuestionError::ReservedOptionKey(key));
        }
        Ok(Self(key))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── ANSWER CHOICE ─────────────────────────────────────────────────────────────
//

/// Value recorded for one question of an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AnswerChoice {
    #[default]
    Skipped,
    Option(OptionKey),
}

impl AnswerChoice {
    pub const SKIP_TOKEN: &'static str = "SKIP";

    /// Parses user input: `skip` (any case) or an option key.
    ///
    /// Whether the key exists on a given question is checked when the answer is recorded.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyOptionKey` for blank input.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, QuestionError> {
        let raw = raw.as_ref();
        if raw.trim().eq_ignore_ascii_case(Self::SKIP_TOKEN) {
            return Ok(Self::Skipped);
        }
        OptionKey::parse(raw).map(Self::Option)
    }

    #[must_use]
    pub fn option(key: OptionKey) -> Self {
        Self::Option(key)
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    #[must_use]
    pub fn key(&self) -> Option<&OptionKey> {
        match self {
            Self::Skipped => None,
            Self::Option(key) => Some(key),
        }
    }
}

impl fmt::Display for AnswerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => f.write_str("skipped"),
            Self::Option(key) => write!(f, "{key}"),
        }
    }
}

//
// ─── QUESTION RECORD ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOption {
    key: OptionKey,
    text: String,
}

impl QuestionOption {
    #[must_use]
    pub fn key(&self) -> &OptionKey {
        &self.key
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One multiple-choice question from the bank.
///
/// Options keep their insertion order, which is also the display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    id: Option<QuestionId>,
    prompt: String,
    options: Vec<QuestionOption>,
    correct_option: OptionKey,
}

impl QuestionRecord {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or an option text is blank, option keys
    /// repeat, or `correct_option` is not among the options.
    pub fn new<K, T>(
        id: Option<QuestionId>,
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = (K, T)>,
        correct_option: impl AsRef<str>,
    ) -> Result<Self, QuestionError>
    where
        K: AsRef<str>,
        T: Into<String>,
    {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let mut seen = HashSet::new();
        let mut parsed = Vec::new();
        for (key, text) in options {
            let key = OptionKey::parse(key)?;
            let text = text.into().trim().to_owned();
            if text.is_empty() {
                return Err(QuestionError::EmptyOptionText { key });
            }
            if !seen.insert(key.clone()) {
                return Err(QuestionError::DuplicateOption { key });
            }
            parsed.push(QuestionOption { key, text });
        }
        if parsed.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let correct_option = OptionKey::parse(correct_option)?;
        if !seen.contains(&correct_option) {
            return Err(QuestionError::UnknownCorrectOption {
                key: correct_option,
            });
        }

        Ok(Self {
            id,
            prompt,
            options: parsed,
            correct_option,
        })
    }

    #[must_use]
    pub fn id(&self) -> Option<QuestionId> {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> &OptionKey {
        &self.correct_option
    }

    /// Text for `key`, or `None` when the question has no such option.
    #[must_use]
    pub fn option_text(&self, key: &OptionKey) -> Option<&str> {
        self.options
            .iter()
            .find(|opt| &opt.key == key)
            .map(QuestionOption::text)
    }

    #[must_use]
    pub fn correct_text(&self) -> Option<&str> {
        self.option_text(&self.correct_option)
    }

    #[must_use]
    pub fn has_option(&self, key: &OptionKey) -> bool {
        self.option_text(key).is_some()
    }

    /// True when `choice` is `Skipped` or names one of this question's options.
    #[must_use]
    pub fn accepts(&self, choice: &AnswerChoice) -> bool {
        choice.key().is_none_or(|key| self.has_option(key))
    }

    #[must_use]
    pub fn is_correct(&self, choice: &AnswerChoice) -> bool {
        choice.key() == Some(&self.correct_option)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
