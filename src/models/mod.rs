/// Data models for the authentication core
///
/// - [`credential`]: Stored identity records
/// - [`role`]: Roles and credential-role assignments
pub mod credential;
pub mod role;

pub use credential::{Credential, NewCredential};
pub use role::{Role, RoleAssignment, DEFAULT_ROLE};
