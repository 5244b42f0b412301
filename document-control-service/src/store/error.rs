use thiserror::Error;

use crate::models::DocumentStatus;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Illegal status transition from {from} to {to}")]
    IllegalTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    #[error("Unresolved reference: {entity} '{id}' does not exist")]
    UnresolvedReference { entity: &'static str, id: String },

    #[error("{entity} '{id}' is still referenced by {count} record(s)")]
    ReferenceInUse {
        entity: &'static str,
        id: String,
        count: usize,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Workflow rule violated: {0}")]
    Workflow(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
