use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::QuestionRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank is empty")]
    Empty,

    #[error("question id {0} appears more than once")]
    DuplicateId(QuestionId),
}

/// Immutable, ordered question bank shared by every attempt of a run.
///
/// Cloning is cheap; records live behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    records: Arc<[QuestionRecord]>,
}

impl QuestionBank {
    /// # Errors
    ///
    /// Returns `BankError::Empty` for an empty list and `BankError::DuplicateId`
    /// if two records carry the same id.
    pub fn new(records: Vec<QuestionRecord>) -> Result<Self, BankError> {
        if records.is_empty() {
            return Err(BankError::Empty);
        }
        let mut ids = HashSet::new();
        for id in records.iter().filter_map(QuestionRecord::id) {
            if !ids.insert(id) {
                return Err(BankError::DuplicateId(id));
            }
        }
        Ok(Self {
            records: records.into(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QuestionRecord> {
        self.records.get(index)
    }

    #[must_use]
    pub fn find(&self, id: QuestionId) -> Option<&QuestionRecord> {
        self.records.iter().find(|q| q.id() == Some(id))
    }
}
