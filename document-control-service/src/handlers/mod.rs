pub mod audit_logs;
pub mod document_types;
pub mod documents;
pub mod health;
pub mod metrics;
pub mod reports;
pub mod users;
pub mod workflows;

pub use health::health_check;
pub use metrics::metrics_endpoint;

use service_core::error::AppError;

use crate::store::StoreError;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::IllegalTransition { .. }
            | StoreError::ReferenceInUse { .. }
            | StoreError::Conflict(_)
            | StoreError::Workflow(_) => AppError::Conflict(anyhow::Error::new(err)),
            StoreError::UnresolvedReference { .. } | StoreError::Validation(_) => {
                AppError::Unprocessable(anyhow::Error::new(err))
            }
            StoreError::Serialization(_) => AppError::InternalError(anyhow::Error::new(err)),
        }
    }
}

pub(crate) fn not_found(entity: &str, id: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("{} '{}' not found", entity, id))
}
