use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use exam_core::model::QuestionBank;

use crate::repository::{QuestionBankRepository, StorageError};

mod mapping;

use mapping::RawQuestion;

/// Parses a bank from JSON text: an array of question objects.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::InvalidRecord`/`MissingCorrectOption`/`Bank` for records
/// that do not form a valid bank.
pub fn parse_bank(json: &str) -> Result<QuestionBank, StorageError> {
    let raw: Vec<RawQuestion> =
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
    let records = raw
        .into_iter()
        .enumerate()
        .map(|(index, q)| q.into_record(index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QuestionBank::new(records)?)
}

/// Question bank stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonQuestionBank {
    path: PathBuf,
}

impl JsonQuestionBank {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionBankRepository for JsonQuestionBank {
    async fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::NotFound {
                    path: self.path.clone(),
                },
                _ => StorageError::Io(e.to_string()),
            })?;
        let bank = parse_bank(&text)?;
        tracing::info!(path = %self.path.display(), questions = bank.len(), "loaded question bank");
        Ok(bank)
    }
}
