/// In-memory identity store for tests and demos
///
/// Behaves like [`super::postgres::PgIdentityStore`] without external
/// dependencies: usernames and emails are unique, inserts that collide fail
/// with [`StoreError::Duplicate`], and role names come back ordered by
/// assignment time.
///
/// `new()` seeds the same roles the migrations do ("User", "Admin");
/// `unseeded()` starts with no roles at all, which is useful for exercising
/// the implicit-default-role path.
///
/// # Example
///
/// ```
/// use trackdesk_auth::models::NewCredential;
/// use trackdesk_auth::store::{IdentityStore, InMemoryIdentityStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryIdentityStore::new();
///
/// store.insert(NewCredential {
///     username: "alice".to_string(),
///     password_hash: "blob".to_string(),
///     email: None,
/// }).await?;
///
/// assert!(store.exists_by_username("alice").await?);
/// # Ok(())
/// # }
/// ```
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::{Credential, NewCredential, Role, RoleAssignment};
use crate::store::{IdentityStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    credentials: Vec<Credential>,
    roles: Vec<Role>,
    assignments: Vec<RoleAssignment>,
}

/// Process-local identity store
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    inner: Mutex<Inner>,
}

impl InMemoryIdentityStore {
    /// Creates a store seeded with the "User" and "Admin" roles
    pub fn new() -> Self {
        let store = Self::unseeded();
        {
            let mut inner = store.inner.lock().expect("store lock poisoned");
            inner.roles.push(Role {
                id: Uuid::new_v4(),
                name: "User".to_string(),
                description: Some("Standard user with access to their own tasks".to_string()),
            });
            inner.roles.push(Role {
                id: Uuid::new_v4(),
                name: "Admin".to_string(),
                description: Some("Administrator with access to all tasks".to_string()),
            });
        }
        store
    }

    /// Creates a completely empty store with no seeded roles
    pub fn unseeded() -> Self {
        Self::default()
    }

    /// Number of stored credentials
    pub fn credential_count(&self) -> usize {
        self.inner.lock().expect("store lock poisoned").credentials.len()
    }

    /// Flips the `is_active` flag on a credential (test helper)
    pub fn set_active(&self, username: &str, active: bool) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if let Some(credential) = inner
            .credentials
            .iter_mut()
            .find(|c| c.username == username)
        {
            credential.is_active = active;
            credential.updated_at = Some(Utc::now());
        }
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner
            .credentials
            .iter()
            .find(|c| c.username == username)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner.credentials.iter().any(|c| c.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner
            .credentials
            .iter()
            .any(|c| c.email.as_deref() == Some(email)))
    }

    async fn insert(&self, data: NewCredential) -> Result<Credential, StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        // Authoritative uniqueness guard, same as the SQL constraints
        if inner.credentials.iter().any(|c| c.username == data.username) {
            return Err(StoreError::Duplicate { field: "username" });
        }
        if let Some(email) = &data.email {
            if inner
                .credentials
                .iter()
                .any(|c| c.email.as_deref() == Some(email.as_str()))
            {
                return Err(StoreError::Duplicate { field: "email" });
            }
        }

        let credential = Credential {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            email: data.email,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        };

        inner.credentials.push(credential.clone());
        Ok(credential)
    }

    async fn role_names(&self, credential_id: Uuid) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");

        let mut assigned: Vec<&RoleAssignment> = inner
            .assignments
            .iter()
            .filter(|a| a.credential_id == credential_id)
            .collect();
        assigned.sort_by_key(|a| a.assigned_at);

        Ok(assigned
            .iter()
            .filter_map(|a| {
                inner
                    .roles
                    .iter()
                    .find(|r| r.id == a.role_id)
                    .map(|r| r.name.clone())
            })
            .collect())
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner.roles.iter().find(|r| r.name == name).cloned())
    }

    async fn assign_role(
        &self,
        credential_id: Uuid,
        role_id: Uuid,
        assigned_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");

        let already = inner
            .assignments
            .iter()
            .any(|a| a.credential_id == credential_id && a.role_id == role_id);
        if !already {
            inner.assignments.push(RoleAssignment {
                credential_id,
                role_id,
                assigned_at,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_credential(username: &str, email: Option<&str>) -> NewCredential {
        NewCredential {
            username: username.to_string(),
            password_hash: "blob".to_string(),
            email: email.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryIdentityStore::new();

        let created = store
            .insert(new_credential("alice", Some("alice@example.com")))
            .await
            .expect("insert should succeed");
        assert!(created.is_active);

        let found = store
            .find_by_username("alice")
            .await
            .expect("lookup should succeed")
            .expect("alice should exist");
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_username_lookup_is_case_sensitive() {
        let store = InMemoryIdentityStore::new();
        store
            .insert(new_credential("Alice", None))
            .await
            .expect("insert should succeed");

        assert!(store
            .find_by_username("alice")
            .await
            .expect("lookup should succeed")
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = InMemoryIdentityStore::new();
        store
            .insert(new_credential("alice", None))
            .await
            .expect("first insert should succeed");

        let result = store.insert(new_credential("alice", None)).await;
        assert!(matches!(
            result,
            Err(StoreError::Duplicate { field: "username" })
        ));
        assert_eq!(store.credential_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryIdentityStore::new();
        store
            .insert(new_credential("alice", Some("shared@example.com")))
            .await
            .expect("first insert should succeed");

        let result = store
            .insert(new_credential("bob", Some("shared@example.com")))
            .await;
        assert!(matches!(
            result,
            Err(StoreError::Duplicate { field: "email" })
        ));
    }

    #[tokio::test]
    async fn test_role_names_ordered_by_assignment() {
        let store = InMemoryIdentityStore::new();
        let credential = store
            .insert(new_credential("alice", None))
            .await
            .expect("insert should succeed");

        let user = store
            .find_role_by_name("User")
            .await
            .expect("lookup should succeed")
            .expect("role should be seeded");
        let admin = store
            .find_role_by_name("Admin")
            .await
            .expect("lookup should succeed")
            .expect("role should be seeded");

        let t0 = Utc::now();
        store
            .assign_role(credential.id, admin.id, t0)
            .await
            .expect("assign should succeed");
        store
            .assign_role(credential.id, user.id, t0 + chrono::Duration::seconds(1))
            .await
            .expect("assign should succeed");

        let names = store
            .role_names(credential.id)
            .await
            .expect("lookup should succeed");
        assert_eq!(names, vec!["Admin".to_string(), "User".to_string()]);
    }

    #[tokio::test]
    async fn test_unseeded_store_has_no_roles() {
        let store = InMemoryIdentityStore::unseeded();
        assert!(store
            .find_role_by_name("User")
            .await
            .expect("lookup should succeed")
            .is_none());
    }
}
