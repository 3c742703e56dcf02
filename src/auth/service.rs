/// Authentication service
///
/// Orchestrates the two security-sensitive flows of the system:
///
/// - **Login**: identity lookup → active check → password verification →
///   role resolution → token issuance
/// - **Registration**: field validation → uniqueness checks → password
///   hashing → persistence → default role assignment
///
/// The service is stateless between calls; all durable state lives behind
/// the [`IdentityStore`] trait. Every authentication-level failure (unknown
/// user, inactive user, wrong password) collapses to the same `Ok(None)`
/// so that response shape cannot be used to enumerate usernames. The
/// sub-reason is only visible in internal logs.
///
/// # Example
///
/// ```
/// use trackdesk_auth::auth::service::{AuthService, LoginRequest, RegisterRequest};
/// use trackdesk_auth::config::JwtConfig;
/// use trackdesk_auth::store::InMemoryIdentityStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = JwtConfig {
///     secret: "test-secret-key-at-least-32-bytes-long".to_string(),
///     ..Default::default()
/// };
/// let service = AuthService::new(InMemoryIdentityStore::new(), config)?;
///
/// let outcome = service
///     .register(&RegisterRequest {
///         username: "alice".to_string(),
///         password: "pw123456".to_string(),
///         confirm_password: "pw123456".to_string(),
///         email: None,
///     })
///     .await?;
/// assert!(outcome.success);
///
/// let session = service
///     .authenticate(&LoginRequest {
///         username: "alice".to_string(),
///         password: "pw123456".to_string(),
///     })
///     .await?
///     .expect("login should succeed");
/// assert_eq!(session.username, "alice");
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use validator::Validate;

use crate::auth::jwt::{TokenError, TokenService};
use crate::auth::password::{self, PasswordError};
use crate::config::JwtConfig;
use crate::models::{NewCredential, DEFAULT_ROLE};
use crate::store::{IdentityStore, StoreError};

/// Error type for authentication service operations
///
/// Only infrastructure-level faults surface here. "Denied" is not an error:
/// `authenticate` signals it as `Ok(None)` and `register` as a structured
/// `success = false` response.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Identity store fault (unreachable, corrupt data, ...)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Token issuance fault (missing secret, encoding failure)
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Password hashing fault
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username (case-sensitive)
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Plaintext password (never logged, never stored)
    #[validate(length(min = 6, max = 100, message = "Password must be 6-100 characters"))]
    pub password: String,
}

/// Successful login response
///
/// The role list is a snapshot taken at issuance: role changes after login
/// are not reflected until the token expires and the user re-authenticates.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,

    /// Authenticated username
    pub username: String,

    /// When the token expires
    pub expires_at: DateTime<Utc>,

    /// Role names embedded in the token
    pub roles: Vec<String>,
}

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username (unique, case-sensitive)
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Plaintext password
    #[validate(length(min = 6, max = 100, message = "Password must be 6-100 characters"))]
    pub password: String,

    /// Password confirmation, must match `password`
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,

    /// Optional email address (unique when present)
    #[validate(email(message = "Email must be well-formed"))]
    pub email: Option<String>,
}

/// Registration outcome
///
/// Unlike login, registration failures carry a human-readable reason:
/// enumeration-safety does not apply when the user is actively choosing a
/// new identifier.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    /// Whether the registration succeeded
    pub success: bool,

    /// Registered username (present on success)
    pub username: Option<String>,

    /// Human-readable outcome message
    pub message: String,
}

impl RegisterResponse {
    fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            username: None,
            message: message.into(),
        }
    }
}

/// Stateless authentication orchestrator over an identity store
pub struct AuthService<S> {
    store: S,
    tokens: TokenService,
}

impl<S: IdentityStore> AuthService<S> {
    /// Creates the service
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MissingSecret`] (fatal, startup-adjacent) when
    /// no signing secret is configured.
    pub fn new(store: S, jwt_config: JwtConfig) -> Result<Self, TokenError> {
        Ok(Self {
            store,
            tokens: TokenService::new(jwt_config)?,
        })
    }

    /// The token service used for issuance, also usable for validating
    /// bearer tokens on subsequent requests
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// The underlying identity store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Authenticates a username/password pair and issues a token
    ///
    /// Returns `Ok(None)` for every denial — out-of-range fields, unknown
    /// username, inactive account and wrong password are structurally
    /// indistinguishable to the caller. Only store/issuance infrastructure
    /// faults become `Err`.
    pub async fn authenticate(
        &self,
        request: &LoginRequest,
    ) -> Result<Option<LoginResponse>, AuthError> {
        if request.validate().is_err() {
            // No credential can exist with out-of-range fields; deny without
            // touching the store, in the same shape as every other denial.
            warn!(username = %request.username, "login attempt with out-of-range fields");
            return Ok(None);
        }

        let credential = match self.store.find_by_username(&request.username).await? {
            Some(credential) => credential,
            None => {
                warn!(username = %request.username, "login attempt for unknown username");
                return Ok(None);
            }
        };

        if !credential.is_active {
            warn!(username = %credential.username, "login attempt for inactive account");
            return Ok(None);
        }

        if !password::verify_password(&request.password, &credential.password_hash) {
            warn!(username = %credential.username, "login attempt with wrong password");
            return Ok(None);
        }

        let mut roles = self.store.role_names(credential.id).await?;
        if roles.is_empty() {
            // No explicit assignments: the identity implicitly holds the
            // default role for token-issuance purposes.
            roles.push(DEFAULT_ROLE.to_string());
        }

        let issued = self.tokens.issue(&credential.username, &roles)?;

        info!(username = %credential.username, "login succeeded");

        Ok(Some(LoginResponse {
            token: issued.token,
            username: credential.username,
            expires_at: issued.expires_at,
            roles,
        }))
    }

    /// Registers a new credential and assigns the default role
    ///
    /// Field constraints (including the password/confirmation match) are
    /// re-validated here rather than trusted to the transport layer, since
    /// the service may be called programmatically.
    ///
    /// The username/email pre-checks only exist for friendly messages; the
    /// store's unique constraints are the authoritative guard, so a lost
    /// insert race maps to the same rejection.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AuthError> {
        if let Err(errors) = request.validate() {
            return Ok(RegisterResponse::rejected(first_message(&errors)));
        }

        if self.store.exists_by_username(&request.username).await? {
            return Ok(RegisterResponse::rejected("Username is already taken"));
        }

        if let Some(email) = &request.email {
            if self.store.exists_by_email(email).await? {
                return Ok(RegisterResponse::rejected("Email is already in use"));
            }
        }

        let password_hash = password::hash_password(&request.password)?;

        let credential = match self
            .store
            .insert(NewCredential {
                username: request.username.clone(),
                password_hash,
                email: request.email.clone(),
            })
            .await
        {
            Ok(credential) => credential,
            Err(StoreError::Duplicate { field }) => {
                // Lost a race with a concurrent registration; the constraint
                // is authoritative and the message stays the friendly one.
                warn!(username = %request.username, field, "registration lost uniqueness race");
                return Ok(RegisterResponse::rejected(match field {
                    "email" => "Email is already in use",
                    _ => "Username is already taken",
                }));
            }
            Err(e) => return Err(e.into()),
        };

        // Assignment failure after a successful insert is tolerated: a
        // roleless credential still logs in with the implicit default role.
        match self.store.find_role_by_name(DEFAULT_ROLE).await {
            Ok(Some(role)) => {
                if let Err(e) = self
                    .store
                    .assign_role(credential.id, role.id, Utc::now())
                    .await
                {
                    error!(username = %credential.username, error = %e, "default role assignment failed");
                }
            }
            Ok(None) => {
                warn!(role = DEFAULT_ROLE, "default role is not seeded");
            }
            Err(e) => {
                error!(username = %credential.username, error = %e, "default role lookup failed");
            }
        }

        info!(username = %credential.username, "registration succeeded");

        Ok(RegisterResponse {
            success: true,
            username: Some(credential.username),
            message: "Registration successful".to_string(),
        })
    }

    /// Checks whether a username is already taken
    ///
    /// Exposed for the request-handling layer's use (e.g. availability
    /// checks during signup).
    pub async fn user_exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.store.exists_by_username(username).await?)
    }
}

/// Extracts the first human-readable message from a validation failure
fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid registration request".to_string())
}
