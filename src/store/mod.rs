/// Identity store boundary
///
/// The authentication service is stateless; all durable state (credentials,
/// roles, assignments) lives behind the [`IdentityStore`] trait. Two
/// implementations are provided:
///
/// - [`postgres::PgIdentityStore`]: production store backed by sqlx/Postgres
/// - [`memory::InMemoryIdentityStore`]: process-local store for tests and demos
///
/// # Uniqueness
///
/// The service performs check-then-insert for friendly error messages, but
/// that pattern has a race window. The store's insert path is the
/// authoritative guard: a concurrent duplicate must surface as
/// [`StoreError::Duplicate`] from `insert`, backed by a unique constraint
/// (or equivalent), never silently succeed.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Credential, NewCredential, Role};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryIdentityStore;
pub use postgres::PgIdentityStore;

/// Error type for identity store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint (username or email) was violated on insert
    #[error("duplicate {field}")]
    Duplicate {
        /// Which field collided ("username" or "email")
        field: &'static str,
    },

    /// Infrastructure-level fault (connection lost, corrupt data, ...)
    #[error("identity store failure: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // Map unique-constraint violations to a structured duplicate
            if let Some(constraint) = db_err.constraint() {
                if constraint.contains("username") {
                    return StoreError::Duplicate { field: "username" };
                }
                if constraint.contains("email") {
                    return StoreError::Duplicate { field: "email" };
                }
            }
        }

        StoreError::Database(err.to_string())
    }
}

/// Read/write contract for credentials and role assignments
///
/// [`role_names`](IdentityStore::role_names) returns a plain ordered
/// collection keyed by credential id rather than a live object graph; the
/// service snapshots it into the token at issuance time.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Finds a credential by exact, case-sensitive username
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError>;

    /// Checks whether a username is already taken
    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError>;

    /// Checks whether an email address is already in use
    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;

    /// Persists a new credential (`is_active = true`, `created_at = now`)
    ///
    /// Fails with [`StoreError::Duplicate`] when the username or email
    /// collides, even when a pre-check raced and passed.
    async fn insert(&self, data: NewCredential) -> Result<Credential, StoreError>;

    /// Role names held by a credential, ordered by assignment time
    async fn role_names(&self, credential_id: Uuid) -> Result<Vec<String>, StoreError>;

    /// Finds a role by its unique name
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError>;

    /// Links a credential to a role
    async fn assign_role(
        &self,
        credential_id: Uuid,
        role_id: Uuid,
        assigned_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
