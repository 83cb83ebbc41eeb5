use exam_core::model::{QuestionId, QuestionRecord};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::repository::StorageError;

/// Options as they appear in a bank file.
///
/// The keyed form (`{"A": "...", "B": "..."}`) is the canonical one. The listed
/// form (`["...", "..."]`) gets letters `A`, `B`, ... in order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawOptions {
    Keyed(Map<String, Value>),
    Listed(Vec<String>),
}

/// One record of the bank file, before validation.
#[derive(Debug, Deserialize)]
pub(crate) struct RawQuestion {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(alias = "pregunta", alias = "texto")]
    pub prompt: String,
    #[serde(alias = "opciones")]
    pub options: RawOptions,
    #[serde(default, alias = "respuesta_correcta")]
    pub correct_option: Option<String>,
    #[serde(default, alias = "correcta")]
    pub correct_text: Option<String>,
}

fn option_text(index: usize, key: &str, value: Value) -> Result<String, StorageError> {
    match value {
        Value::String(text) => Ok(text),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(StorageError::Serialization(format!(
            "question #{index}: option {key} must be text, got {other}"
        ))),
    }
}

fn letter(position: usize) -> String {
    let mut n = position;
    let mut out = Vec::new();
    loop {
        out.push(b'A' + u8::try_from(n % 26).unwrap_or(0));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

impl RawQuestion {
    /// Validates the raw record into a `QuestionRecord`.
    ///
    /// `index` is the zero-based position in the file, used in error messages.
    pub(crate) fn into_record(self, index: usize) -> Result<QuestionRecord, StorageError> {
        let options: Vec<(String, String)> = match self.options {
            RawOptions::Keyed(map) => map
                .into_iter()
                .map(|(key, value)| {
                    let text = option_text(index, &key, value)?;
                    Ok((key, text))
                })
                .collect::<Result<_, StorageError>>()?,
            RawOptions::Listed(texts) => texts
                .into_iter()
                .enumerate()
                .map(|(pos, text)| (letter(pos), text))
                .collect(),
        };

        let correct = match (self.correct_option, self.correct_text) {
            (Some(key), _) => key,
            (None, Some(text)) => options
                .iter()
                .find(|(_, candidate)| candidate.trim() == text.trim())
                .map(|(key, _)| key.clone())
                .ok_or(StorageError::MissingCorrectOption { index })?,
            (None, None) => return Err(StorageError::MissingCorrectOption { index }),
        };

        QuestionRecord::new(self.id.map(QuestionId::new), self.prompt, options, correct)
            .map_err(|source| StorageError::InvalidRecord { index, source })
    }
}
