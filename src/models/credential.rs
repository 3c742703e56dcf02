/// Credential model
///
/// A credential is the stored identity record: username, password hash and
/// account status. Role membership is resolved through the
/// `role_assignments` join table (see [`crate::models::role`]).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE credentials (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(50) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     email VARCHAR(255) UNIQUE,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ
/// );
/// ```
///
/// Username lookup is case-sensitive: `"Alice"` and `"alice"` are two
/// distinct identities.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored identity record
///
/// The password hash is an opaque blob produced by
/// [`crate::auth::password::hash_password`]; it is skipped during
/// serialization so it can never leak through a response body.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Credential {
    /// Unique credential ID (UUID v4)
    pub id: Uuid,

    /// Username (unique, case-sensitive, 3-50 chars)
    pub username: String,

    /// Opaque salted password hash
    ///
    /// Never store plaintext passwords, never serialize this outward.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional email address (unique when present)
    pub email: Option<String>,

    /// Whether the account may log in
    ///
    /// Inactive accounts are denied exactly like unknown usernames.
    pub is_active: bool,

    /// When the credential was created
    pub created_at: DateTime<Utc>,

    /// When the credential was last updated (None if never)
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a new credential
///
/// The store sets `id`, `is_active = true` and `created_at` itself.
#[derive(Debug, Clone)]
pub struct NewCredential {
    /// Username (unique, case-sensitive)
    pub username: String,

    /// Already-hashed password (NOT plaintext!)
    pub password_hash: String,

    /// Optional email address
    pub email: Option<String>,
}
