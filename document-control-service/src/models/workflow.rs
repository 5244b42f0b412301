//! Review/approval workflows attached to documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::UserRole;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkflowStatus {
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Rejected,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SignatureAction {
    Approved,
    Rejected,
    Reviewed,
}

impl SignatureAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureAction::Approved => "Approved",
            SignatureAction::Rejected => "Rejected",
            SignatureAction::Reviewed => "Reviewed",
        }
    }
}

/// Signature manifestation captured when a step is signed.
///
/// `digital_signature` is an opaque fingerprint of the signing context. It is
/// never verified and must not be treated as a cryptographic signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElectronicSignature {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_role: UserRole,
    pub timestamp: DateTime<Utc>,
    pub action: SignatureAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub ip_address: String,
    pub digital_signature: String,
    pub reason_for_action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: String,
    pub step_name: String,
    pub step_order: u32,
    pub assigned_role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user: Option<String>,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<ElectronicSignature>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    /// Weak reference; the document may have been deleted since.
    pub document_id: String,
    pub workflow_name: String,
    pub document_type: String,
    pub steps: Vec<WorkflowStep>,
    pub current_step: usize,
    pub status: WorkflowStatus,
    pub initiated_by: String,
    pub initiated_at: DateTime<Utc>,
}

impl Workflow {
    pub fn step(&self, step_id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn signatures(&self) -> Vec<&ElectronicSignature> {
        self.steps.iter().filter_map(|s| s.signature.as_ref()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkflowStep {
    #[validate(length(min = 1, message = "Step name is required"))]
    pub step_name: String,
    pub assigned_role: UserRole,
    #[serde(default)]
    pub assigned_user: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkflow {
    #[validate(length(min = 1, message = "Document id is required"))]
    pub document_id: String,
    #[validate(length(min = 1, message = "Workflow name is required"))]
    pub workflow_name: String,
    #[validate(length(min = 1, message = "Initiator is required"))]
    pub initiated_by: String,
    #[validate(length(min = 1, message = "A workflow needs at least one step"), nested)]
    pub steps: Vec<NewWorkflowStep>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkflowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Workflow name cannot be empty"))]
    pub workflow_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkflowStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<WorkflowStep>>,
}

/// A signer's decision on the current step.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignStep {
    #[validate(length(min = 1, message = "Signer user id is required"))]
    pub user_id: String,
    pub action: SignatureAction,
    #[validate(length(min = 1, message = "A reason for the action is required"))]
    pub reason_for_action: String,
    #[serde(default)]
    pub comments: Option<String>,
}
