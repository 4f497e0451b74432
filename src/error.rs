use thiserror::Error;

use crate::object_id::ObjectId;

/// Everything a repository operation can fail with.
///
/// `Io`, `Encoding`, `Utf8` and `MissingObject` are persistence
/// failures: the mutation did not happen and the prior snapshot is
/// still the current one. `NotFound` and `Conflict` are ordinary
/// caller-recoverable outcomes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt revision metadata: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("page content is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("object {0} missing from store")]
    MissingObject(ObjectId),
    #[error("page {0} is not tracked")]
    NotFound(String),
    #[error("head revision is {actual:?}, caller expected {expected:?}")]
    Conflict {
        expected: Option<ObjectId>,
        actual: Option<ObjectId>,
    },
    #[error("invalid page name {0:?}: names are limited to letters, digits, '_' and '-'")]
    InvalidName(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}
