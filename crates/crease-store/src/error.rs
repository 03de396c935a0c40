use crease_scoring::ScoringError;
use crease_types::{DomainError, ScorerRole};
use thiserror::Error;

/// Errors surfaced by the storage and session layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not persist the document. The session rolls
    /// back to its last committed state when this happens.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
    /// The caller's role does not permit the attempted operation.
    #[error("role {role} may not perform this operation")]
    Forbidden { role: ScorerRole },
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}
