use serde::Serialize;

use crate::models::{Document, ElectronicSignature, Workflow};
use crate::store::{Store, StoreError};

/// A workflow with its document resolved and its signatures collected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDetail {
    pub workflow: Workflow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    /// Set when the linked document has been deleted.
    pub unresolved_document: bool,
    pub signatures: Vec<ElectronicSignature>,
}

impl WorkflowDetail {
    pub fn build(store: &Store, workflow: Workflow) -> Result<Self, StoreError> {
        let document = match store.workflow_document(&workflow) {
            Ok(document) => Some(document),
            Err(StoreError::UnresolvedReference { .. }) => {
                tracing::debug!(
                    workflow_id = %workflow.id,
                    document_id = %workflow.document_id,
                    "Workflow refers to a deleted document"
                );
                None
            }
            Err(e) => return Err(e),
        };
        let signatures = workflow.signatures().into_iter().cloned().collect();

        Ok(Self {
            unresolved_document: document.is_none(),
            document,
            signatures,
            workflow,
        })
    }
}
