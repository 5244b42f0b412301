//! Derived figures for the dashboard and reporting endpoints. Everything is
//! recomputed from snapshots on each read.

use serde::Serialize;

use crate::models::{
    AuditLog, Document, DocumentStatus, DocumentType, EntityType, User, UserRole, Workflow,
    WorkflowStatus,
};

/// Approved share of all documents as a percentage with one decimal place.
/// Zero when there are no documents.
pub fn compliance_rate(approved: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = approved as f64 / total as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

fn count_status(documents: &[Document], status: DocumentStatus) -> usize {
    documents.iter().filter(|d| d.status == status).count()
}

fn count_active(workflows: &[Workflow]) -> usize {
    workflows
        .iter()
        .filter(|w| w.status == WorkflowStatus::Active)
        .count()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_documents: usize,
    pub active_workflows: usize,
    pub pending_approvals: usize,
    pub compliance_rate: f64,
}

impl DashboardStats {
    pub fn compute(documents: &[Document], workflows: &[Workflow]) -> Self {
        Self {
            total_documents: documents.len(),
            active_workflows: count_active(workflows),
            pending_approvals: count_status(documents, DocumentStatus::InReview),
            compliance_rate: compliance_rate(
                count_status(documents, DocumentStatus::Approved),
                documents.len(),
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSummary {
    pub total_documents: usize,
    pub approved: usize,
    pub pending_review: usize,
    pub draft: usize,
    pub compliance_rate: f64,
    pub audit_entries: usize,
    pub active_workflows: usize,
    /// Signed steps across every workflow.
    pub electronic_signatures: usize,
}

impl ComplianceSummary {
    pub fn compute(documents: &[Document], workflows: &[Workflow], audit_entries: usize) -> Self {
        let approved = count_status(documents, DocumentStatus::Approved);
        Self {
            total_documents: documents.len(),
            approved,
            pending_review: count_status(documents, DocumentStatus::InReview),
            draft: count_status(documents, DocumentStatus::Draft),
            compliance_rate: compliance_rate(approved, documents.len()),
            audit_entries,
            active_workflows: count_active(workflows),
            electronic_signatures: workflows.iter().map(|w| w.signatures().len()).sum(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total_entries: usize,
    pub document_entries: usize,
    pub workflow_entries: usize,
    pub user_entries: usize,
    pub system_entries: usize,
}

impl AuditSummary {
    pub fn compute(entries: &[AuditLog]) -> Self {
        let count = |t: EntityType| entries.iter().filter(|e| e.entity_type == t).count();
        Self {
            total_entries: entries.len(),
            document_entries: count(EntityType::Document),
            workflow_entries: count(EntityType::Workflow),
            user_entries: count(EntityType::User),
            system_entries: count(EntityType::System),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoleCount {
    pub role: UserRole,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub total_users: usize,
    pub active_users: usize,
    pub by_role: Vec<RoleCount>,
}

impl UserSummary {
    pub fn compute(users: &[User]) -> Self {
        Self {
            total_users: users.len(),
            active_users: users.iter().filter(|u| u.is_active).count(),
            by_role: UserRole::ALL
                .into_iter()
                .map(|role| RoleCount {
                    role,
                    count: users.iter().filter(|u| u.role == role).count(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeUsage {
    #[serde(flatten)]
    pub document_type: DocumentType,
    pub document_count: usize,
}

impl From<(DocumentType, usize)> for DocumentTypeUsage {
    fn from((document_type, document_count): (DocumentType, usize)) -> Self {
        Self {
            document_type,
            document_count,
        }
    }
}

/// Filtered audit entries cut to the display limit.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrailPage {
    pub entries: Vec<AuditLog>,
    pub showing: usize,
    pub matched: usize,
    pub total: usize,
}

impl AuditTrailPage {
    pub fn new(mut matched: Vec<AuditLog>, total: usize, limit: usize) -> Self {
        let matched_count = matched.len();
        matched.truncate(limit);
        Self {
            showing: matched.len(),
            matched: matched_count,
            total,
            entries: matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Actor, AuditAction, NewWorkflow, NewWorkflowStep, SignStep, SignatureAction,
    };
    use crate::store::{AuditEntryDraft, AuditTrail, Store};

    #[test]
    fn compliance_rate_rounds_to_one_decimal() {
        assert_eq!(compliance_rate(2, 3), 66.7);
        assert_eq!(compliance_rate(1, 3), 33.3);
        assert_eq!(compliance_rate(3, 3), 100.0);
    }

    #[test]
    fn compliance_rate_is_zero_without_documents() {
        assert_eq!(compliance_rate(0, 0), 0.0);
    }

    #[test]
    fn seeded_summaries() {
        let store = Store::seeded();
        let documents = store.all_documents();

        let compliance =
            ComplianceSummary::compute(&documents, &store.all_workflows(), store.audit_log_count());
        assert_eq!(compliance.total_documents, 3);
        assert_eq!(compliance.approved, 2);
        assert_eq!(compliance.pending_review, 1);
        assert_eq!(compliance.draft, 0);
        assert_eq!(compliance.compliance_rate, 66.7);
        assert_eq!(compliance.audit_entries, 0);
        assert_eq!(compliance.active_workflows, 0);
        assert_eq!(compliance.electronic_signatures, 0);

        let dashboard = DashboardStats::compute(&documents, &store.all_workflows());
        assert_eq!(dashboard.total_documents, 3);
        assert_eq!(dashboard.active_workflows, 0);
        assert_eq!(dashboard.pending_approvals, 1);

        let users = UserSummary::compute(&store.all_users());
        assert_eq!(users.total_users, 3);
        assert_eq!(users.active_users, 3);
        let admins = users.by_role.iter().find(|r| r.role == UserRole::Admin).unwrap();
        assert_eq!(admins.count, 1);
    }

    #[test]
    fn compliance_counts_workflows_and_signatures() {
        let store = Store::seeded();
        let document = store
            .all_documents()
            .into_iter()
            .find(|d| d.document_number == "VAL-MPV-003")
            .unwrap();
        let review = NewWorkflow {
            document_id: document.id.clone(),
            workflow_name: "Validation Review".to_string(),
            initiated_by: "John Smith".to_string(),
            steps: vec![
                NewWorkflowStep {
                    step_name: "Technical Review".to_string(),
                    assigned_role: UserRole::Reviewer,
                    assigned_user: None,
                },
                NewWorkflowStep {
                    step_name: "Management Approval".to_string(),
                    assigned_role: UserRole::Manager,
                    assigned_user: None,
                },
            ],
        };
        let first = store.create_workflow(&Actor::system(), review.clone()).unwrap();
        store.create_workflow(&Actor::system(), review).unwrap();

        let reviewer = store.user_by_id("3").unwrap();
        let actor = Actor::for_user(&reviewer, "127.0.0.1".to_string(), "s".to_string());
        store
            .sign_workflow_step(
                &actor,
                &first.id,
                &first.steps[0].id,
                SignStep {
                    user_id: reviewer.id.clone(),
                    action: SignatureAction::Reviewed,
                    reason_for_action: "Protocol followed".to_string(),
                    comments: None,
                },
            )
            .unwrap();

        let summary = ComplianceSummary::compute(
            &store.all_documents(),
            &store.all_workflows(),
            store.audit_log_count(),
        );
        assert_eq!(summary.active_workflows, 2);
        assert_eq!(summary.electronic_signatures, 1);
        assert_eq!(summary.audit_entries, 3);
    }

    #[test]
    fn audit_summary_counts_by_entity_type() {
        let mut trail = AuditTrail::default();
        let actor = Actor::system();
        trail.record(&actor, AuditEntryDraft::new(AuditAction::CreateDocument, EntityType::Document, "d"));
        trail.record(&actor, AuditEntryDraft::new(AuditAction::UpdateDocument, EntityType::Document, "d"));
        trail.record(&actor, AuditEntryDraft::new(AuditAction::CreateDocumentType, EntityType::System, "t"));

        let summary = AuditSummary::compute(trail.entries());
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.document_entries, 2);
        assert_eq!(summary.system_entries, 1);
        assert_eq!(summary.workflow_entries, 0);
    }

    #[test]
    fn trail_page_truncates_to_limit() {
        let mut trail = AuditTrail::default();
        let actor = Actor::system();
        for i in 0..5 {
            trail.record(
                &actor,
                AuditEntryDraft::new(AuditAction::CreateUser, EntityType::User, &i.to_string()),
            );
        }

        let page = AuditTrailPage::new(trail.entries().to_vec(), 7, 3);
        assert_eq!(page.showing, 3);
        assert_eq!(page.matched, 5);
        assert_eq!(page.total, 7);
        assert_eq!(page.entries[0].entity_id, "0");
    }

    #[test]
    fn type_usage_flattens_catalog_entry() {
        let usage = DocumentTypeUsage::from((
            DocumentType {
                id: "1".to_string(),
                type_name: "Manual".to_string(),
                description: "Comprehensive guides and manuals".to_string(),
            },
            4,
        ));
        let value = serde_json::to_value(&usage).unwrap();
        assert_eq!(value["type"], "Manual");
        assert_eq!(value["documentCount"], 4);
    }
}
