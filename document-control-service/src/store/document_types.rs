use super::merge::apply_patch;
use super::{new_id, AuditEntryDraft, Store, StoreError, StoreResult, StoreState};
use crate::models::{
    Actor, AuditAction, DocumentType, DocumentTypePatch, EntityType, NewDocumentType,
};

impl StoreState {
    fn type_usage(&self, type_name: &str) -> usize {
        self.documents
            .values()
            .filter(|d| d.document_type.as_str() == type_name)
            .count()
    }

    fn ensure_type_name_free(&self, name: &str, except_id: Option<&str>) -> StoreResult<()> {
        let taken = self
            .document_types
            .values()
            .any(|t| Some(t.id.as_str()) != except_id && t.type_name.eq_ignore_ascii_case(name));
        if taken {
            return Err(StoreError::Conflict(format!(
                "Document type '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    fn insert_document_type(
        &mut self,
        actor: &Actor,
        fields: NewDocumentType,
    ) -> StoreResult<DocumentType> {
        self.ensure_type_name_free(&fields.type_name, None)?;

        let entry = DocumentType {
            id: new_id(),
            type_name: fields.type_name,
            description: fields.description,
        };
        self.document_types.insert(entry.id.clone(), entry.clone());
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::CreateDocumentType, EntityType::System, &entry.id),
        );
        Ok(entry)
    }

    fn patch_document_type(
        &mut self,
        actor: &Actor,
        id: &str,
        patch: &DocumentTypePatch,
    ) -> StoreResult<Option<DocumentType>> {
        let Some(current) = self.document_types.get(id) else {
            return Ok(None);
        };

        if let Some(name) = patch.type_name.as_deref() {
            if name != current.type_name {
                self.ensure_type_name_free(name, Some(id))?;
                let count = self.type_usage(&current.type_name);
                if count > 0 {
                    return Err(StoreError::ReferenceInUse {
                        entity: "DocumentType",
                        id: id.to_string(),
                        count,
                    });
                }
            }
        }

        let (updated, changes) = apply_patch(current, patch)?;
        self.document_types.insert(id.to_string(), updated.clone());
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::UpdateDocumentType, EntityType::System, id)
                .with_changes(changes),
        );
        Ok(Some(updated))
    }

    fn remove_document_type(&mut self, actor: &Actor, id: &str) -> StoreResult<bool> {
        let Some(entry) = self.document_types.get(id) else {
            return Ok(false);
        };
        let count = self.type_usage(&entry.type_name);
        if count > 0 {
            return Err(StoreError::ReferenceInUse {
                entity: "DocumentType",
                id: id.to_string(),
                count,
            });
        }

        self.document_types.shift_remove(id);
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::DeleteDocumentType, EntityType::System, id),
        );
        Ok(true)
    }
}

impl Store {
    pub fn all_document_types(&self) -> Vec<DocumentType> {
        self.read().document_types.values().cloned().collect()
    }

    pub fn document_type_by_id(&self, id: &str) -> Option<DocumentType> {
        self.read().document_types.get(id).cloned()
    }

    pub fn create_document_type(
        &self,
        actor: &Actor,
        fields: NewDocumentType,
    ) -> StoreResult<DocumentType> {
        self.write().insert_document_type(actor, fields)
    }

    pub fn update_document_type(
        &self,
        actor: &Actor,
        id: &str,
        patch: DocumentTypePatch,
    ) -> StoreResult<Option<DocumentType>> {
        self.write().patch_document_type(actor, id, &patch)
    }

    /// Refused with `ReferenceInUse` while any document names this type.
    pub fn delete_document_type(&self, actor: &Actor, id: &str) -> StoreResult<bool> {
        self.write().remove_document_type(actor, id)
    }

    /// Each catalog entry with the number of documents that name it.
    pub fn document_type_usage(&self) -> Vec<(DocumentType, usize)> {
        let state = self.read();
        state
            .document_types
            .values()
            .map(|t| (t.clone(), state.type_usage(&t.type_name)))
            .collect()
    }
}
