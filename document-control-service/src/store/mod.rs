//! In-memory record store.
//!
//! A single `Store` owns every entity map and the audit trail. All state sits
//! behind one `RwLock`: each mutating call holds the write lock across the
//! change and its audit entry, so readers never observe one without the
//! other. Accessors return clones.

mod audit;
mod document_types;
mod documents;
mod error;
mod merge;
mod seed;
mod users;
mod workflows;

pub use audit::{AuditEntryDraft, AuditTrail};
pub use error::{StoreError, StoreResult};

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::models::{AuditLog, Document, DocumentType, User, Workflow};

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    documents: IndexMap<String, Document>,
    document_types: IndexMap<String, DocumentType>,
    workflows: IndexMap<String, Workflow>,
    users: IndexMap<String, User>,
    audit: AuditTrail,
}

#[derive(Debug, Default)]
pub struct Store {
    state: RwLock<StoreState>,
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Store {
    /// Empty store with no catalog, users, or documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store loaded with the fixture catalog, users, and documents.
    pub fn seeded() -> Self {
        let store = Self::new();
        seed::load_fixtures(&mut store.write());
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read()
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write()
    }

    pub fn all_audit_logs(&self) -> Vec<AuditLog> {
        self.read().audit.entries().to_vec()
    }

    pub fn audit_logs_by_entity_id(&self, entity_id: &str) -> Vec<AuditLog> {
        self.read().audit.filtered(|e| e.entity_id == entity_id)
    }

    pub fn audit_logs_by_user_id(&self, user_id: &str) -> Vec<AuditLog> {
        self.read().audit.filtered(|e| e.user_id == user_id)
    }

    pub fn audit_log_count(&self) -> usize {
        self.read().audit.entries().len()
    }
}
