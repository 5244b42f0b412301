//! List filters. Each filter deserializes straight from a query string; an
//! absent field matches everything.

use serde::Deserialize;

use crate::models::{AuditLog, Document, DocumentKind, DocumentStatus, EntityType};

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    /// Case-insensitive match on title, number, or author.
    pub search: Option<String>,
    pub status: Option<DocumentStatus>,
    pub document_type: Option<DocumentKind>,
}

impl DocumentFilter {
    pub fn matches(&self, document: &Document) -> bool {
        if let Some(search) = self.search.as_deref() {
            let needle = search.to_lowercase();
            let hit = contains_ignore_case(&document.document_title, &needle)
                || contains_ignore_case(&document.document_number, &needle)
                || contains_ignore_case(&document.created_by, &needle);
            if !hit {
                return false;
            }
        }
        self.status.map_or(true, |s| document.status == s)
            && self
                .document_type
                .map_or(true, |k| document.document_type == k)
    }

    pub fn apply(&self, documents: Vec<Document>) -> Vec<Document> {
        documents.into_iter().filter(|d| self.matches(d)).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilter {
    /// Case-insensitive match on user name, action, or entity id.
    pub search: Option<String>,
    /// Substring of the action name, so `UPDATE` matches `UPDATE_DOCUMENT`.
    pub action: Option<String>,
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub user_id: Option<String>,
}

impl AuditFilter {
    pub fn matches(&self, entry: &AuditLog) -> bool {
        if let Some(search) = self.search.as_deref() {
            let needle = search.to_lowercase();
            let hit = contains_ignore_case(&entry.user_name, &needle)
                || contains_ignore_case(&entry.action, &needle)
                || contains_ignore_case(&entry.entity_id, &needle);
            if !hit {
                return false;
            }
        }
        self.action
            .as_deref()
            .map_or(true, |a| entry.action.contains(a))
            && self.entity_type.map_or(true, |t| entry.entity_type == t)
            && self
                .entity_id
                .as_deref()
                .map_or(true, |id| entry.entity_id == id)
            && self.user_id.as_deref().map_or(true, |id| entry.user_id == id)
    }

    pub fn apply(&self, entries: Vec<AuditLog>) -> Vec<AuditLog> {
        entries.into_iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Actor, AuditAction};
    use crate::store::Store;
    use crate::store::test_support::new_document;

    #[test]
    fn empty_filter_matches_everything() {
        let store = Store::seeded();
        let all = store.all_documents();
        assert_eq!(DocumentFilter::default().apply(all.clone()), all);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let store = Store::seeded();
        let by_number = DocumentFilter {
            search: Some("sop-dc".to_string()),
            ..Default::default()
        };
        let by_author = DocumentFilter {
            search: Some("MARY".to_string()),
            ..Default::default()
        };

        let found = by_number.apply(store.all_documents());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].document_number, "SOP-DC-001");
        assert_eq!(by_author.apply(store.all_documents()), found);
    }

    #[test]
    fn status_and_type_are_exact() {
        let store = Store::seeded();
        let approved = DocumentFilter {
            status: Some(DocumentStatus::Approved),
            ..Default::default()
        };
        let approved_manuals = DocumentFilter {
            status: Some(DocumentStatus::Approved),
            document_type: Some(DocumentKind::Manual),
            ..Default::default()
        };

        assert_eq!(approved.apply(store.all_documents()).len(), 2);
        assert_eq!(approved_manuals.apply(store.all_documents()).len(), 1);
    }

    #[test]
    fn status_deserializes_from_display_name() {
        let filter: DocumentFilter =
            serde_json::from_value(serde_json::json!({ "status": "In Review" })).unwrap();
        assert_eq!(filter.status, Some(DocumentStatus::InReview));
    }

    #[test]
    fn audit_action_matches_by_substring() {
        let store = Store::seeded();
        let actor = Actor::system();
        let doc = store.create_document(&actor, new_document("SOP-100")).unwrap();
        store.delete_document(&actor, &doc.id);

        let deletes = AuditFilter {
            action: Some("DELETE".to_string()),
            ..Default::default()
        };
        let found = deletes.apply(store.all_audit_logs());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].action, AuditAction::DeleteDocument.as_str());

        let by_search = AuditFilter {
            search: Some("system".to_string()),
            entity_type: Some(EntityType::Document),
            ..Default::default()
        };
        assert_eq!(by_search.apply(store.all_audit_logs()).len(), 2);

        let by_user = AuditFilter {
            user_id: Some("1".to_string()),
            ..Default::default()
        };
        assert!(by_user.apply(store.all_audit_logs()).is_empty());
    }
}
