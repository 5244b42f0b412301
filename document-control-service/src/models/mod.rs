pub mod audit_log;
pub mod document;
pub mod document_type;
pub mod user;
pub mod workflow;

pub use audit_log::{Actor, AuditAction, AuditLog, Changes, EntityType, FieldChange};
pub use document::{
    Document, DocumentKind, DocumentPatch, DocumentSecurity, DocumentStatus, NewDocument,
};
pub use document_type::{DocumentType, DocumentTypePatch, NewDocumentType};
pub use user::{NewUser, Permission, PermissionAction, User, UserPatch, UserRole};
pub use workflow::{
    ElectronicSignature, NewWorkflow, NewWorkflowStep, SignStep, SignatureAction, StepStatus,
    Workflow, WorkflowPatch, WorkflowStatus, WorkflowStep,
};
