//! Controlled document record and its lifecycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Document classification. Each value is expected to name an entry in the
/// document type catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Manual,
    Procedure,
    Process,
    #[serde(rename = "Work Instruction")]
    WorkInstruction,
    Policy,
    Checklist,
    Format,
    Template,
    Masters,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 9] = [
        DocumentKind::Manual,
        DocumentKind::Procedure,
        DocumentKind::Process,
        DocumentKind::WorkInstruction,
        DocumentKind::Policy,
        DocumentKind::Checklist,
        DocumentKind::Format,
        DocumentKind::Template,
        DocumentKind::Masters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Manual => "Manual",
            DocumentKind::Procedure => "Procedure",
            DocumentKind::Process => "Process",
            DocumentKind::WorkInstruction => "Work Instruction",
            DocumentKind::Policy => "Policy",
            DocumentKind::Checklist => "Checklist",
            DocumentKind::Format => "Format",
            DocumentKind::Template => "Template",
            DocumentKind::Masters => "Masters",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentSecurity {
    Confidential,
    Internal,
    Restricted,
    Public,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    Draft,
    #[serde(rename = "In Review")]
    InReview,
    Approved,
    Rejected,
    Archived,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "Draft",
            DocumentStatus::InReview => "In Review",
            DocumentStatus::Approved => "Approved",
            DocumentStatus::Rejected => "Rejected",
            DocumentStatus::Archived => "Archived",
        }
    }

    /// Statuses reachable in one step from `self`.
    pub fn next_states(&self) -> &'static [DocumentStatus] {
        use DocumentStatus::*;
        match self {
            Draft => &[InReview, Archived],
            InReview => &[Approved, Rejected, Draft],
            Approved => &[Archived],
            Rejected => &[Draft, Archived],
            Archived => &[],
        }
    }

    /// Staying in the same status is always allowed.
    pub fn can_transition_to(&self, to: DocumentStatus) -> bool {
        *self == to || self.next_states().contains(&to)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub document_title: String,
    pub document_number: String,
    pub document_version: String,
    pub date_created: NaiveDate,
    pub created_by: String,
    pub date_of_issue: NaiveDate,
    pub issued_by: String,
    pub issuer_role: String,
    pub effective_from_date: NaiveDate,
    pub date_of_next_issue: NaiveDate,
    pub document_type: DocumentKind,
    pub document_category: String,
    pub document_security: DocumentSecurity,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

/// Fields supplied when a document is registered. New documents always start
/// as `Draft`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    #[validate(length(min = 1, message = "Document title is required"))]
    pub document_title: String,
    #[validate(length(min = 1, message = "Document number is required"))]
    pub document_number: String,
    #[serde(default = "default_version")]
    pub document_version: String,
    #[serde(default)]
    pub date_created: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Author is required"))]
    pub created_by: String,
    #[serde(default)]
    pub date_of_issue: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Issuer is required"))]
    pub issued_by: String,
    #[validate(length(min = 1, message = "Issuer role is required"))]
    pub issuer_role: String,
    pub effective_from_date: NaiveDate,
    pub date_of_next_issue: NaiveDate,
    pub document_type: DocumentKind,
    #[serde(default)]
    pub document_category: String,
    pub document_security: DocumentSecurity,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub attachments: Option<Vec<String>>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl NewDocument {
    pub(crate) fn into_document(self, id: String, today: NaiveDate) -> Document {
        Document {
            id,
            document_title: self.document_title,
            document_number: self.document_number,
            document_version: self.document_version,
            date_created: self.date_created.unwrap_or(today),
            created_by: self.created_by,
            date_of_issue: self.date_of_issue.unwrap_or(today),
            issued_by: self.issued_by,
            issuer_role: self.issuer_role,
            effective_from_date: self.effective_from_date,
            date_of_next_issue: self.date_of_next_issue,
            document_type: self.document_type,
            document_category: self.document_category,
            document_security: self.document_security,
            status: DocumentStatus::Draft,
            content: self.content,
            attachments: self.attachments,
        }
    }
}

/// Partial update. Only present keys are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Document title cannot be empty"))]
    pub document_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Document number cannot be empty"))]
    pub document_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_issue: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Issuer cannot be empty"))]
    pub issued_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Issuer role cannot be empty"))]
    pub issuer_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_next_issue: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_security: Option<DocumentSecurity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

impl DocumentPatch {
    pub fn status(status: DocumentStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}
