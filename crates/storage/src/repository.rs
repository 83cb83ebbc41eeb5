use std::path::PathBuf;

use async_trait::async_trait;
use exam_core::model::{BankError, QuestionBank, QuestionError, QuestionRecord};
use thiserror::Error;

/// Errors surfaced while loading a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("question bank not found at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("io error: {0}")]
    Io(String),

    #[error("malformed question bank: {0}")]
    Serialization(String),

    #[error("question #{index} is invalid: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("question #{index} has no correct answer")]
    MissingCorrectOption { index: usize },

    #[error(transparent)]
    Bank(#[from] BankError),
}

/// Source of the question bank.
///
/// Hosts load the bank once at startup; the result is immutable for the rest
/// of the run.
#[async_trait]
pub trait QuestionBankRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read or any record is invalid.
    async fn load_bank(&self) -> Result<QuestionBank, StorageError>;
}

/// Bank held in memory, for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionBank {
    records: Vec<QuestionRecord>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: QuestionRecord) {
        self.records.push(record);
    }
}

#[async_trait]
impl QuestionBankRepository for InMemoryQuestionBank {
    async fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        Ok(QuestionBank::new(self.records.clone())?)
    }
}
