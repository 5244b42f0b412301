//! Append-only audit recorder.

use chrono::Utc;
use metrics::counter;
use uuid::Uuid;

use crate::models::{Actor, AuditAction, AuditLog, Changes, EntityType};

/// What happened, to which record. The recorder adds the id, timestamp, and
/// actor identity.
#[derive(Debug, Clone)]
pub struct AuditEntryDraft {
    action: AuditAction,
    entity_type: EntityType,
    entity_id: String,
    changes: Option<Changes>,
    metadata: Option<serde_json::Value>,
}

impl AuditEntryDraft {
    pub fn new(action: AuditAction, entity_type: EntityType, entity_id: &str) -> Self {
        Self {
            action,
            entity_type,
            entity_id: entity_id.to_string(),
            changes: None,
            metadata: None,
        }
    }

    pub fn with_changes(mut self, changes: Changes) -> Self {
        self.changes = Some(changes);
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Entries can be appended and read, never edited or removed.
#[derive(Debug, Default)]
pub struct AuditTrail {
    entries: Vec<AuditLog>,
}

impl AuditTrail {
    pub fn record(&mut self, actor: &Actor, draft: AuditEntryDraft) -> &AuditLog {
        let entry = AuditLog {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            user_id: actor.user_id.clone(),
            user_name: actor.user_name.clone(),
            user_role: actor.user_role.clone(),
            action: draft.action.as_str().to_string(),
            entity_type: draft.entity_type,
            entity_id: draft.entity_id,
            changes: draft.changes,
            ip_address: actor.ip_address.clone(),
            session_id: actor.session_id.clone(),
            metadata: draft.metadata,
        };

        tracing::info!(
            audit_id = %entry.id,
            action = %entry.action,
            entity_type = ?entry.entity_type,
            entity_id = %entry.entity_id,
            user_id = %entry.user_id,
            "Audit entry recorded"
        );
        counter!("dcs_audit_entries_total", "action" => draft.action.as_str()).increment(1);

        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[AuditLog] {
        &self.entries
    }

    pub fn filtered<F>(&self, predicate: F) -> Vec<AuditLog>
    where
        F: Fn(&AuditLog) -> bool,
    {
        self.entries.iter().filter(|e| predicate(e)).cloned().collect()
    }
}
