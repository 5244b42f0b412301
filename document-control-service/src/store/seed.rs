//! Fixture data loaded into a fresh store. Seeding is not audited.

use chrono::{NaiveDate, TimeZone, Utc};

use super::{new_id, StoreState};
use crate::models::{
    Document, DocumentKind, DocumentSecurity, DocumentStatus, DocumentType, Permission,
    PermissionAction, User, UserRole,
};

use PermissionAction::{Approve, Create, Delete, Read, Sign, Update};

const CATALOG: [(&str, DocumentKind, &str); 9] = [
    ("1", DocumentKind::Manual, "Comprehensive guides and manuals"),
    ("2", DocumentKind::Procedure, "Standard Operating Procedures (SOPs)"),
    ("3", DocumentKind::Process, "Process documentation"),
    ("4", DocumentKind::WorkInstruction, "Detailed work instructions"),
    ("5", DocumentKind::Policy, "Company policies and guidelines"),
    ("6", DocumentKind::Checklist, "Quality checklists"),
    ("7", DocumentKind::Format, "Document formats and templates"),
    ("8", DocumentKind::Template, "Reusable document templates"),
    ("9", DocumentKind::Masters, "Master documents"),
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn user(
    id: &str,
    username: &str,
    full_name: &str,
    role: UserRole,
    department: &str,
    permissions: Vec<Permission>,
    created: NaiveDate,
) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{}@pharma.com", username),
        full_name: full_name.to_string(),
        role,
        department: department.to_string(),
        is_active: true,
        permissions,
        created_at: Utc.from_utc_datetime(&created.and_hms_opt(0, 0, 0).unwrap_or_default()),
        last_login: None,
    }
}

struct DocumentFixture {
    title: &'static str,
    number: &'static str,
    version: &'static str,
    author: &'static str,
    author_role: &'static str,
    created: NaiveDate,
    issued: NaiveDate,
    effective: NaiveDate,
    next_issue: NaiveDate,
    kind: DocumentKind,
    category: &'static str,
    security: DocumentSecurity,
    status: DocumentStatus,
}

impl DocumentFixture {
    fn into_document(self) -> Document {
        Document {
            id: new_id(),
            document_title: self.title.to_string(),
            document_number: self.number.to_string(),
            document_version: self.version.to_string(),
            date_created: self.created,
            created_by: self.author.to_string(),
            date_of_issue: self.issued,
            issued_by: self.author.to_string(),
            issuer_role: self.author_role.to_string(),
            effective_from_date: self.effective,
            date_of_next_issue: self.next_issue,
            document_type: self.kind,
            document_category: self.category.to_string(),
            document_security: self.security,
            status: self.status,
            content: None,
            attachments: None,
        }
    }
}

pub(super) fn load_fixtures(state: &mut StoreState) {
    for (id, kind, description) in CATALOG {
        state.document_types.insert(
            id.to_string(),
            DocumentType {
                id: id.to_string(),
                type_name: kind.as_str().to_string(),
                description: description.to_string(),
            },
        );
    }

    let users = [
        user(
            "1",
            "admin",
            "System Administrator",
            UserRole::Admin,
            "IT",
            vec![
                Permission::new("documents", &[Create, Read, Update, Delete, Approve, Sign]),
                Permission::new("workflows", &[Create, Read, Update, Delete]),
                Permission::new("users", &[Create, Read, Update, Delete]),
            ],
            date(2024, 1, 1),
        ),
        user(
            "2",
            "jsmith",
            "John Smith",
            UserRole::Manager,
            "Quality Assurance",
            vec![
                Permission::new("documents", &[Create, Read, Update, Approve, Sign]),
                Permission::new("workflows", &[Create, Read, Update]),
            ],
            date(2024, 1, 15),
        ),
        user(
            "3",
            "mjohnson",
            "Mary Johnson",
            UserRole::Reviewer,
            "Regulatory Affairs",
            vec![Permission::new("documents", &[Read, Approve, Sign])],
            date(2024, 2, 1),
        ),
    ];
    for user in users {
        state.users.insert(user.id.clone(), user);
    }

    let documents = [
        DocumentFixture {
            title: "Quality Management System Manual",
            number: "QMS-001",
            version: "1.0",
            author: "John Smith",
            author_role: "Manager",
            created: date(2024, 1, 10),
            issued: date(2024, 1, 15),
            effective: date(2024, 2, 1),
            next_issue: date(2025, 1, 15),
            kind: DocumentKind::Manual,
            category: "Quality Management",
            security: DocumentSecurity::Internal,
            status: DocumentStatus::Approved,
        },
        DocumentFixture {
            title: "Standard Operating Procedure - Document Control",
            number: "SOP-DC-001",
            version: "2.1",
            author: "Mary Johnson",
            author_role: "Reviewer",
            created: date(2024, 2, 5),
            issued: date(2024, 2, 10),
            effective: date(2024, 2, 15),
            next_issue: date(2025, 2, 10),
            kind: DocumentKind::Procedure,
            category: "Document Management",
            security: DocumentSecurity::Internal,
            status: DocumentStatus::Approved,
        },
        DocumentFixture {
            title: "Manufacturing Process Validation Protocol",
            number: "VAL-MPV-003",
            version: "1.0",
            author: "John Smith",
            author_role: "Manager",
            created: date(2024, 3, 1),
            issued: date(2024, 3, 5),
            effective: date(2024, 3, 10),
            next_issue: date(2025, 3, 5),
            kind: DocumentKind::Process,
            category: "Manufacturing",
            security: DocumentSecurity::Confidential,
            status: DocumentStatus::InReview,
        },
    ];
    for fixture in documents {
        let document = fixture.into_document();
        state.documents.insert(document.id.clone(), document);
    }

    tracing::info!(
        document_types = state.document_types.len(),
        users = state.users.len(),
        documents = state.documents.len(),
        "Loaded fixture data"
    );
}
