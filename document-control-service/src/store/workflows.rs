use chrono::{DateTime, Utc};
use serde_json::json;
use sha2::{Digest, Sha256};

use super::merge::{apply_patch, diff_records};
use super::{new_id, AuditEntryDraft, Store, StoreError, StoreResult, StoreState};
use crate::models::{
    Actor, AuditAction, Document, DocumentPatch, DocumentStatus, ElectronicSignature, EntityType,
    NewWorkflow, PermissionAction, SignStep, SignatureAction, StepStatus, UserRole, Workflow,
    WorkflowPatch, WorkflowStatus, WorkflowStep,
};

/// Opaque fingerprint of a signing event. Not a cryptographic signature and
/// never verified.
pub(crate) fn signature_fingerprint(
    signature_id: &str,
    workflow_id: &str,
    step_id: &str,
    user_id: &str,
    action: SignatureAction,
    timestamp: DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(
        format!(
            "{}|{}|{}|{}|{}|{}",
            signature_id,
            workflow_id,
            step_id,
            user_id,
            action.as_str(),
            timestamp.to_rfc3339()
        )
        .as_bytes(),
    );
    hex::encode(hasher.finalize())
}

fn rule(message: impl Into<String>) -> StoreError {
    StoreError::Workflow(message.into())
}

/// True when `after` adds, drops, or alters a step's signature or completion
/// fields relative to `before`.
fn rewrites_sign_off(before: &Workflow, after: &Workflow) -> bool {
    let dropped = before
        .steps
        .iter()
        .filter(|s| s.signature.is_some() || s.completed_at.is_some())
        .any(|s| after.step(&s.id).is_none());

    dropped
        || after.steps.iter().any(|step| {
            let prior = before.step(&step.id);
            step.signature.as_ref() != prior.and_then(|p| p.signature.as_ref())
                || step.completed_at != prior.and_then(|p| p.completed_at)
                || step.completed_by.as_deref() != prior.and_then(|p| p.completed_by.as_deref())
        })
}

impl StoreState {
    fn insert_workflow(&mut self, actor: &Actor, fields: NewWorkflow) -> StoreResult<Workflow> {
        if fields.steps.is_empty() {
            return Err(StoreError::Validation(
                "A workflow needs at least one step".to_string(),
            ));
        }
        let document = self.documents.get(&fields.document_id).ok_or_else(|| {
            StoreError::UnresolvedReference {
                entity: "Document",
                id: fields.document_id.clone(),
            }
        })?;

        let steps = fields
            .steps
            .into_iter()
            .enumerate()
            .map(|(i, draft)| WorkflowStep {
                id: new_id(),
                step_name: draft.step_name,
                step_order: i as u32 + 1,
                assigned_role: draft.assigned_role,
                assigned_user: draft.assigned_user,
                status: if i == 0 {
                    StepStatus::InProgress
                } else {
                    StepStatus::Pending
                },
                completed_at: None,
                completed_by: None,
                comments: None,
                signature: None,
            })
            .collect();

        let workflow = Workflow {
            id: new_id(),
            document_id: fields.document_id,
            workflow_name: fields.workflow_name,
            document_type: document.document_type.as_str().to_string(),
            steps,
            current_step: 0,
            status: WorkflowStatus::Active,
            initiated_by: fields.initiated_by,
            initiated_at: Utc::now(),
        };
        self.workflows.insert(workflow.id.clone(), workflow.clone());
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::CreateWorkflow, EntityType::Workflow, &workflow.id)
                .with_metadata(json!({ "documentId": workflow.document_id })),
        );
        Ok(workflow)
    }

    fn patch_workflow(
        &mut self,
        actor: &Actor,
        id: &str,
        patch: &WorkflowPatch,
    ) -> StoreResult<Option<Workflow>> {
        let Some(current) = self.workflows.get(id) else {
            return Ok(None);
        };

        let (updated, changes) = apply_patch(current, patch)?;
        if updated.current_step >= updated.steps.len() {
            return Err(StoreError::Validation(format!(
                "currentStep {} is out of range for {} step(s)",
                updated.current_step,
                updated.steps.len()
            )));
        }
        if rewrites_sign_off(current, &updated) {
            return Err(rule(
                "Step signatures and completion records change only through signing",
            ));
        }

        self.workflows.insert(id.to_string(), updated.clone());
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::UpdateWorkflow, EntityType::Workflow, id)
                .with_changes(changes),
        );
        Ok(Some(updated))
    }

    fn remove_workflow(&mut self, actor: &Actor, id: &str) -> bool {
        if self.workflows.shift_remove(id).is_none() {
            return false;
        }
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::DeleteWorkflow, EntityType::Workflow, id),
        );
        true
    }

    fn sign_step(
        &mut self,
        actor: &Actor,
        workflow_id: &str,
        step_id: &str,
        request: &SignStep,
    ) -> StoreResult<Option<Workflow>> {
        let Some(current) = self.workflows.get(workflow_id) else {
            return Ok(None);
        };
        if request.user_id != actor.user_id {
            return Err(rule(format!(
                "Signer '{}' is not the acting user '{}'",
                request.user_id, actor.user_id
            )));
        }
        if current.status != WorkflowStatus::Active {
            return Err(rule(format!(
                "Workflow is {:?} and no longer accepts signatures",
                current.status
            )));
        }

        let index = current
            .steps
            .iter()
            .position(|s| s.id == step_id)
            .ok_or_else(|| rule(format!("Step '{}' is not part of this workflow", step_id)))?;
        if index != current.current_step {
            return Err(rule("Only the current step can be signed"));
        }
        let step = &current.steps[index];
        if step.status != StepStatus::InProgress {
            return Err(rule("Step is not in progress"));
        }

        let signer = self.users.get(&request.user_id).ok_or_else(|| {
            StoreError::UnresolvedReference {
                entity: "User",
                id: request.user_id.clone(),
            }
        })?;
        if !signer.is_active {
            return Err(rule(format!("User '{}' is inactive", signer.username)));
        }
        if !signer.can("documents", PermissionAction::Sign) {
            return Err(rule(format!(
                "User '{}' is not permitted to sign documents",
                signer.username
            )));
        }
        if signer.role != step.assigned_role && signer.role != UserRole::Admin {
            return Err(rule(format!(
                "Step is assigned to role {}, signer has role {}",
                step.assigned_role, signer.role
            )));
        }
        if let Some(assigned) = step.assigned_user.as_deref() {
            if assigned != signer.username {
                return Err(rule(format!("Step is assigned to user '{}'", assigned)));
            }
        }

        let now = Utc::now();
        let signature_id = new_id();
        let signature = ElectronicSignature {
            digital_signature: signature_fingerprint(
                &signature_id,
                workflow_id,
                step_id,
                &signer.id,
                request.action,
                now,
            ),
            id: signature_id,
            user_id: signer.id.clone(),
            user_name: signer.full_name.clone(),
            user_role: signer.role,
            timestamp: now,
            action: request.action,
            comments: request.comments.clone(),
            ip_address: actor.ip_address.clone(),
            reason_for_action: request.reason_for_action.clone(),
        };
        let signature_id = signature.id.clone();

        let mut updated = current.clone();
        let is_last = index + 1 == updated.steps.len();
        {
            let step = &mut updated.steps[index];
            step.completed_at = Some(now);
            step.completed_by = Some(signer.full_name.clone());
            step.comments = request.comments.clone();
            step.signature = Some(signature);
        }
        let document_outcome = match request.action {
            SignatureAction::Approved | SignatureAction::Reviewed => {
                updated.steps[index].status = StepStatus::Completed;
                if is_last {
                    updated.status = WorkflowStatus::Completed;
                    Some(DocumentStatus::Approved)
                } else {
                    updated.steps[index + 1].status = StepStatus::InProgress;
                    updated.current_step = index + 1;
                    None
                }
            }
            SignatureAction::Rejected => {
                updated.steps[index].status = StepStatus::Rejected;
                updated.status = WorkflowStatus::Cancelled;
                Some(DocumentStatus::Rejected)
            }
        };

        let changes = diff_records(current, &updated)?;
        self.workflows.insert(workflow_id.to_string(), updated.clone());
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::SignWorkflowStep, EntityType::Workflow, workflow_id)
                .with_changes(changes)
                .with_metadata(json!({
                    "stepId": step_id,
                    "signatureId": signature_id,
                    "action": request.action.as_str(),
                })),
        );

        if let Some(target) = document_outcome {
            self.settle_linked_document(actor, &updated.document_id, target)?;
        }
        Ok(Some(updated))
    }

    /// Moves a linked `In Review` document to the outcome of its workflow.
    fn settle_linked_document(
        &mut self,
        actor: &Actor,
        document_id: &str,
        target: DocumentStatus,
    ) -> StoreResult<()> {
        match self.documents.get(document_id).map(|d| d.status) {
            Some(DocumentStatus::InReview) => {
                self.patch_document(actor, document_id, &DocumentPatch::status(target))?;
            }
            Some(status) => {
                tracing::warn!(
                    document_id = %document_id,
                    status = %status,
                    "Linked document is not in review, leaving status unchanged"
                );
            }
            None => {
                tracing::warn!(document_id = %document_id, "Linked document no longer exists");
            }
        }
        Ok(())
    }

    fn cancel(
        &mut self,
        actor: &Actor,
        id: &str,
        reason: Option<&str>,
    ) -> StoreResult<Option<Workflow>> {
        let Some(current) = self.workflows.get(id) else {
            return Ok(None);
        };
        if current.status != WorkflowStatus::Active {
            return Err(rule("Only active workflows can be cancelled"));
        }

        let mut updated = current.clone();
        updated.status = WorkflowStatus::Cancelled;
        let changes = diff_records(current, &updated)?;

        self.workflows.insert(id.to_string(), updated.clone());
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::CancelWorkflow, EntityType::Workflow, id)
                .with_changes(changes)
                .with_metadata(json!({ "reason": reason })),
        );
        Ok(Some(updated))
    }
}

impl Store {
    pub fn all_workflows(&self) -> Vec<Workflow> {
        self.read().workflows.values().cloned().collect()
    }

    pub fn workflow_by_id(&self, id: &str) -> Option<Workflow> {
        self.read().workflows.get(id).cloned()
    }

    pub fn workflows_by_document_id(&self, document_id: &str) -> Vec<Workflow> {
        self.read()
            .workflows
            .values()
            .filter(|w| w.document_id == document_id)
            .cloned()
            .collect()
    }

    pub fn create_workflow(&self, actor: &Actor, fields: NewWorkflow) -> StoreResult<Workflow> {
        self.write().insert_workflow(actor, fields)
    }

    pub fn update_workflow(
        &self,
        actor: &Actor,
        id: &str,
        patch: WorkflowPatch,
    ) -> StoreResult<Option<Workflow>> {
        self.write().patch_workflow(actor, id, &patch)
    }

    pub fn delete_workflow(&self, actor: &Actor, id: &str) -> bool {
        self.write().remove_workflow(actor, id)
    }

    /// Record a signer's decision on the workflow's current step.
    ///
    /// Completing the last step approves the linked document; a rejection
    /// cancels the workflow and rejects the document. Either document change
    /// only applies while the document is `In Review`, and is audited as its
    /// own `UPDATE_DOCUMENT` entry.
    pub fn sign_workflow_step(
        &self,
        actor: &Actor,
        workflow_id: &str,
        step_id: &str,
        request: SignStep,
    ) -> StoreResult<Option<Workflow>> {
        self.write().sign_step(actor, workflow_id, step_id, &request)
    }

    pub fn cancel_workflow(
        &self,
        actor: &Actor,
        id: &str,
        reason: Option<&str>,
    ) -> StoreResult<Option<Workflow>> {
        self.write().cancel(actor, id, reason)
    }

    /// Resolve the workflow's document. Fails once the document is deleted.
    pub fn workflow_document(&self, workflow: &Workflow) -> StoreResult<Document> {
        self.read()
            .documents
            .get(&workflow.document_id)
            .cloned()
            .ok_or_else(|| StoreError::UnresolvedReference {
                entity: "Document",
                id: workflow.document_id.clone(),
            })
    }
}
