//! Domain error taxonomy.
//!
//! Four recoverable classes, translated structurally from `StoreError` —
//! never by inspecting message text. The HTTP layer maps NotFound to 404 and
//! the other three to 400; anything else is a 500.

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// A requested record does not exist
    #[error("{0}")]
    NotFound(String),

    /// A referenced id does not exist or is incompatible (e.g. cross-plant
    /// neighbor)
    #[error("{0}")]
    InvalidForeignKey(String),

    /// Empty or malformed input, disconnected equipment area set,
    /// self-neighbor request
    #[error("{0}")]
    InvalidData(String),

    /// Deletion blocked by existing dependents
    #[error("{0}")]
    DependencyExists(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ForeignKey(msg) => DomainError::InvalidForeignKey(msg),
            StoreError::Constraint(msg) => DomainError::InvalidData(msg),
            StoreError::Dependency(msg) => DomainError::DependencyExists(msg),
            StoreError::Other(err) => DomainError::Internal(err),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
