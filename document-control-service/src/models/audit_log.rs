//! Audit trail entries and the actor identity copied into them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::user::User;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityType {
    Document,
    Workflow,
    User,
    System,
}

/// Audited operations. Rendered as `VERB_NOUN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    CreateDocument,
    UpdateDocument,
    DeleteDocument,
    CreateDocumentType,
    UpdateDocumentType,
    DeleteDocumentType,
    CreateWorkflow,
    UpdateWorkflow,
    DeleteWorkflow,
    SignWorkflowStep,
    CancelWorkflow,
    CreateUser,
    UpdateUser,
    DeleteUser,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::CreateDocument => "CREATE_DOCUMENT",
            AuditAction::UpdateDocument => "UPDATE_DOCUMENT",
            AuditAction::DeleteDocument => "DELETE_DOCUMENT",
            AuditAction::CreateDocumentType => "CREATE_DOCUMENT_TYPE",
            AuditAction::UpdateDocumentType => "UPDATE_DOCUMENT_TYPE",
            AuditAction::DeleteDocumentType => "DELETE_DOCUMENT_TYPE",
            AuditAction::CreateWorkflow => "CREATE_WORKFLOW",
            AuditAction::UpdateWorkflow => "UPDATE_WORKFLOW",
            AuditAction::DeleteWorkflow => "DELETE_WORKFLOW",
            AuditAction::SignWorkflowStep => "SIGN_WORKFLOW_STEP",
            AuditAction::CancelWorkflow => "CANCEL_WORKFLOW",
            AuditAction::CreateUser => "CREATE_USER",
            AuditAction::UpdateUser => "UPDATE_USER",
            AuditAction::DeleteUser => "DELETE_USER",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    pub old: serde_json::Value,
    pub new: serde_json::Value,
}

/// Field name -> before/after values.
pub type Changes = BTreeMap<String, FieldChange>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub user_name: String,
    pub user_role: String,
    pub action: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Changes>,
    pub ip_address: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Who performed a mutating call, and from where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub user_name: String,
    pub user_role: String,
    pub ip_address: String,
    pub session_id: String,
}

pub const LOCAL_IP: &str = "127.0.0.1";

impl Actor {
    pub fn system() -> Self {
        Self {
            user_id: "system".to_string(),
            user_name: "System".to_string(),
            user_role: "System".to_string(),
            ip_address: LOCAL_IP.to_string(),
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn for_user(user: &User, ip_address: String, session_id: String) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.full_name.clone(),
            user_role: user.role.as_str().to_string(),
            ip_address,
            session_id,
        }
    }
}
