//! # trackdesk-auth
//!
//! Authentication core for the trackdesk task tracker. This crate owns the
//! security-sensitive pieces — salted password hashing, signed time-bound
//! token issuance and validation, and the login/registration state machine —
//! while the task service and HTTP layer live elsewhere and call into it
//! with a username/password pair or a bearer token.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, JWT issuance/validation, the auth service
//! - `models`: credential, role and role-assignment data structures
//! - `store`: identity store trait plus Postgres and in-memory backends
//! - `config`: environment-driven configuration
//!
//! ## Example
//!
//! ```
//! use trackdesk_auth::auth::{AuthService, LoginRequest};
//! use trackdesk_auth::config::JwtConfig;
//! use trackdesk_auth::store::InMemoryIdentityStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let jwt = JwtConfig {
//!     secret: "a-signing-secret-at-least-32-bytes-long".to_string(),
//!     ..Default::default()
//! };
//! let service = AuthService::new(InMemoryIdentityStore::new(), jwt)?;
//!
//! let denied = service
//!     .authenticate(&LoginRequest {
//!         username: "ghost".to_string(),
//!         password: "anything".to_string(),
//!     })
//!     .await?;
//! assert!(denied.is_none());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod models;
pub mod store;

/// Current version of the trackdesk-auth library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
