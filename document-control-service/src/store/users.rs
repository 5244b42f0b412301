use chrono::Utc;

use super::merge::apply_patch;
use super::{new_id, AuditEntryDraft, Store, StoreError, StoreResult, StoreState};
use crate::models::{Actor, AuditAction, EntityType, NewUser, User, UserPatch};

impl StoreState {
    fn insert_user(&mut self, actor: &Actor, fields: NewUser) -> StoreResult<User> {
        if self
            .users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&fields.username))
        {
            return Err(StoreError::Conflict(format!(
                "Username '{}' is already taken",
                fields.username
            )));
        }

        let user = User {
            id: new_id(),
            username: fields.username,
            email: fields.email,
            full_name: fields.full_name,
            role: fields.role,
            department: fields.department,
            is_active: fields.is_active,
            permissions: fields.permissions,
            created_at: Utc::now(),
            last_login: None,
        };
        self.users.insert(user.id.clone(), user.clone());
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::CreateUser, EntityType::User, &user.id),
        );
        Ok(user)
    }

    fn patch_user(
        &mut self,
        actor: &Actor,
        id: &str,
        patch: &UserPatch,
    ) -> StoreResult<Option<User>> {
        let Some(current) = self.users.get(id) else {
            return Ok(None);
        };

        let (updated, changes) = apply_patch(current, patch)?;
        self.users.insert(id.to_string(), updated.clone());
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::UpdateUser, EntityType::User, id)
                .with_changes(changes),
        );
        Ok(Some(updated))
    }

    fn remove_user(&mut self, actor: &Actor, id: &str) -> bool {
        if self.users.shift_remove(id).is_none() {
            return false;
        }
        self.audit.record(
            actor,
            AuditEntryDraft::new(AuditAction::DeleteUser, EntityType::User, id),
        );
        true
    }
}

impl Store {
    pub fn all_users(&self) -> Vec<User> {
        self.read().users.values().cloned().collect()
    }

    pub fn user_by_id(&self, id: &str) -> Option<User> {
        self.read().users.get(id).cloned()
    }

    pub fn create_user(&self, actor: &Actor, fields: NewUser) -> StoreResult<User> {
        self.write().insert_user(actor, fields)
    }

    pub fn update_user(
        &self,
        actor: &Actor,
        id: &str,
        patch: UserPatch,
    ) -> StoreResult<Option<User>> {
        self.write().patch_user(actor, id, &patch)
    }

    pub fn delete_user(&self, actor: &Actor, id: &str) -> bool {
        self.write().remove_user(actor, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Permission, PermissionAction, UserRole};
    use serde_json::json;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@pharma.com", username),
            full_name: "Alex Author".to_string(),
            role: UserRole::Author,
            department: "Quality Assurance".to_string(),
            is_active: true,
            permissions: vec![Permission::new("documents", &[PermissionAction::Create])],
        }
    }

    #[test]
    fn seeded_users_hold_their_permissions() {
        let store = Store::seeded();
        let admin = store.user_by_id("1").unwrap();
        let reviewer = store.user_by_id("3").unwrap();

        assert_eq!(store.all_users().len(), 3);
        assert!(admin.can("users", PermissionAction::Delete));
        assert!(reviewer.can("documents", PermissionAction::Sign));
        assert!(!reviewer.can("documents", PermissionAction::Create));
    }

    #[test]
    fn create_and_audit() {
        let store = Store::seeded();
        let user = store.create_user(&Actor::system(), new_user("aauthor")).unwrap();

        assert!(user.last_login.is_none());
        assert_eq!(store.user_by_id(&user.id), Some(user.clone()));
        let logs = store.audit_logs_by_entity_id(&user.id);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, "CREATE_USER");
        assert_eq!(logs[0].entity_type, EntityType::User);
    }

    #[test]
    fn usernames_are_unique_ignoring_case() {
        let store = Store::seeded();
        let err = store
            .create_user(&Actor::system(), new_user("JSmith"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.audit_log_count(), 0);
    }

    #[test]
    fn deactivation_records_change() {
        let store = Store::seeded();
        let patch = UserPatch {
            is_active: Some(false),
            ..Default::default()
        };

        let updated = store
            .update_user(&Actor::system(), "3", patch)
            .unwrap()
            .unwrap();

        assert!(!updated.is_active);
        assert_eq!(updated.username, "mjohnson");
        let changes = store.audit_logs_by_entity_id("3")[0].changes.clone().unwrap();
        assert_eq!(changes["isActive"].old, json!(true));
        assert_eq!(changes["isActive"].new, json!(false));
    }

    #[test]
    fn audit_by_user_id_tracks_the_actor() {
        let store = Store::seeded();
        let admin = store.user_by_id("1").unwrap();
        let actor = Actor::for_user(&admin, "10.0.0.5".to_string(), "session-1".to_string());

        let created = store.create_user(&actor, new_user("aauthor")).unwrap();
        assert!(store.delete_user(&actor, &created.id));
        assert!(!store.delete_user(&actor, &created.id));

        let logs = store.audit_logs_by_user_id("1");
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1].action, "DELETE_USER");
        assert_eq!(logs[1].user_name, "System Administrator");
        assert_eq!(logs[1].ip_address, "10.0.0.5");
        assert_eq!(logs[1].session_id, "session-1");
    }
}
