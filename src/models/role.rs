/// Role and role-assignment models
///
/// Roles are linked to credentials through a many-to-many join table. A
/// credential with zero assignments is treated as holding the default role
/// at token-issuance time, so migrations seeding only needs to guarantee
/// the role rows themselves exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE roles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(50) NOT NULL UNIQUE,
///     description TEXT
/// );
///
/// CREATE TABLE role_assignments (
///     credential_id UUID NOT NULL REFERENCES credentials(id) ON DELETE CASCADE,
///     role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
///     assigned_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (credential_id, role_id)
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the role every newly registered credential receives, and the
/// role implied for credentials that hold no explicit assignment
pub const DEFAULT_ROLE: &str = "User";

/// A named role (e.g. "Admin", "User")
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    /// Unique role ID
    pub id: Uuid,

    /// Role name (unique)
    pub name: String,

    /// Optional human-readable description
    pub description: Option<String>,
}

/// Links one credential to one role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoleAssignment {
    /// Credential holding the role
    pub credential_id: Uuid,

    /// Role held
    pub role_id: Uuid,

    /// When the role was assigned
    pub assigned_at: DateTime<Utc>,
}
