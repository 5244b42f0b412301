pub mod filters;
pub mod reports;
pub mod workflow_detail;

pub use filters::{AuditFilter, DocumentFilter};
pub use reports::{
    compliance_rate, AuditSummary, AuditTrailPage, ComplianceSummary, DashboardStats,
    DocumentTypeUsage, RoleCount, UserSummary,
};
pub use workflow_detail::WorkflowDetail;
