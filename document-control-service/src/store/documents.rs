use chrono::Utc;

use super::merge::apply_patch;
use super::{new_id, AuditEntryDraft, Store, StoreError, StoreResult, StoreState};
use crate::models::{
    Actor, AuditAction, Document, DocumentKind, DocumentPatch, DocumentType, EntityType,
    NewDocument,
};

impl StoreState {
    pub(super) fn catalog_entry(&self, kind: DocumentKind) -> Option<&DocumentType> {
        self.document_types
            .values()
            .find(|t| t.type_name == kind.as_str())
    }

    fn require_catalog_entry(&self, kind: DocumentKind) -> StoreResult<()> {
        match self.catalog_entry(kind) {
            Some(_) => Ok(()),
            None => Err(StoreError::UnresolvedReference {
                entity: "DocumentType",
                id: kind.as_str().to_string(),
            }),
        }
    }

    fn insert_document(&mut self, actor: &Actor, fields: NewDocument) -> StoreResult<Document> {
        self.require_catalog_entry(fields.document_type)?;

        let document = fields.into_document(new_id(), Utc::now().date_naive());
        self.documents.insert(document.id.clone(), document.clone());
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::CreateDocument, EntityType::Document, &document.id),
        );
        Ok(document)
    }

    /// Shared by the HTTP update path and workflow signing.
    pub(super) fn patch_document(
        &mut self,
        actor: &Actor,
        id: &str,
        patch: &DocumentPatch,
    ) -> StoreResult<Option<Document>> {
        let Some(current) = self.documents.get(id) else {
            return Ok(None);
        };

        if let Some(to) = patch.status {
            if !current.status.can_transition_to(to) {
                return Err(StoreError::IllegalTransition {
                    from: current.status,
                    to,
                });
            }
        }
        if let Some(kind) = patch.document_type {
            self.require_catalog_entry(kind)?;
        }

        let (updated, changes) = apply_patch(current, patch)?;
        self.documents.insert(id.to_string(), updated.clone());
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::UpdateDocument, EntityType::Document, id)
                .with_changes(changes),
        );
        Ok(Some(updated))
    }

    fn remove_document(&mut self, actor: &Actor, id: &str) -> bool {
        if self.documents.shift_remove(id).is_none() {
            return false;
        }
        let orphaned = self.workflows.values().filter(|w| w.document_id == id).count();
        if orphaned > 0 {
            tracing::warn!(document_id = %id, orphaned, "Deleted document still has workflows");
        }
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::DeleteDocument, EntityType::Document, id),
        );
        true
    }
}

impl Store {
    pub fn all_documents(&self) -> Vec<Document> {
        self.read().documents.values().cloned().collect()
    }

    pub fn document_by_id(&self, id: &str) -> Option<Document> {
        self.read().documents.get(id).cloned()
    }

    pub fn create_document(&self, actor: &Actor, fields: NewDocument) -> StoreResult<Document> {
        self.write().insert_document(actor, fields)
    }

    pub fn update_document(
        &self,
        actor: &Actor,
        id: &str,
        patch: DocumentPatch,
    ) -> StoreResult<Option<Document>> {
        self.write().patch_document(actor, id, &patch)
    }

    pub fn delete_document(&self, actor: &Actor, id: &str) -> bool {
        self.write().remove_document(actor, id)
    }

    /// Catalog entry named by the document's `documentType`.
    pub fn document_type_of(&self, document: &Document) -> StoreResult<DocumentType> {
        self.read()
            .catalog_entry(document.document_type)
            .cloned()
            .ok_or_else(|| StoreError::UnresolvedReference {
                entity: "DocumentType",
                id: document.document_type.as_str().to_string(),
            })
    }
}
