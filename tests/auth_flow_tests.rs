//! End-to-end authentication flow tests over the in-memory identity store.
//!
//! These exercise the full register -> login -> validate-token path plus the
//! denial and conflict behaviors the service guarantees to its callers.

use trackdesk_auth::auth::{AuthService, LoginRequest, RegisterRequest};
use trackdesk_auth::config::JwtConfig;
use trackdesk_auth::store::{IdentityStore, InMemoryIdentityStore};

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-at-least-32-bytes".to_string(),
        ..Default::default()
    }
}

fn service() -> AuthService<InMemoryIdentityStore> {
    AuthService::new(InMemoryIdentityStore::new(), jwt_config()).expect("service should build")
}

fn register_request(username: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
        email: None,
    }
}

fn login_request(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let service = service();

    let outcome = service
        .register(&register_request("bob", "pw123456"))
        .await
        .expect("register should not error");
    assert!(outcome.success);
    assert_eq!(outcome.username.as_deref(), Some("bob"));

    let session = service
        .authenticate(&login_request("bob", "pw123456"))
        .await
        .expect("authenticate should not error")
        .expect("login should succeed");

    assert_eq!(session.username, "bob");
    assert_eq!(session.roles, vec!["User".to_string()]);
    assert!(!session.token.is_empty());
}

#[tokio::test]
async fn test_issued_token_validates_with_snapshot_claims() {
    let service = service();
    service
        .register(&register_request("bob", "pw123456"))
        .await
        .expect("register should not error");

    let session = service
        .authenticate(&login_request("bob", "pw123456"))
        .await
        .expect("authenticate should not error")
        .expect("login should succeed");

    // A later request presents the bearer token; the validator extracts
    // identity and roles exactly as embedded at issuance.
    let claims = service
        .tokens()
        .validate(&session.token)
        .expect("token should validate");

    assert_eq!(claims.sub, "bob");
    assert_eq!(claims.roles, session.roles);
    assert_eq!(claims.exp, session.expires_at.timestamp());
}

#[tokio::test]
async fn test_login_expiry_matches_configured_lifetime() {
    let service = service();
    service
        .register(&register_request("bob", "pw123456"))
        .await
        .expect("register should not error");

    let before = chrono::Utc::now();
    let session = service
        .authenticate(&login_request("bob", "pw123456"))
        .await
        .expect("authenticate should not error")
        .expect("login should succeed");
    let after = chrono::Utc::now();

    let lifetime = chrono::Duration::minutes(60);
    assert!(session.expires_at >= before + lifetime);
    assert!(session.expires_at <= after + lifetime);
}

#[tokio::test]
async fn test_denials_are_structurally_identical() {
    let service = service();
    service
        .register(&register_request("real_user", "pw123456"))
        .await
        .expect("register should not error");

    // Unknown username and wrong password for an existing user must produce
    // the very same signal, or response shape leaks which usernames exist.
    let ghost = service
        .authenticate(&login_request("ghost", "anything"))
        .await
        .expect("authenticate should not error");
    let wrong_password = service
        .authenticate(&login_request("real_user", "wrong_password"))
        .await
        .expect("authenticate should not error");

    assert!(ghost.is_none());
    assert!(wrong_password.is_none());
}

#[tokio::test]
async fn test_inactive_account_is_denied() {
    let service = service();
    service
        .register(&register_request("bob", "pw123456"))
        .await
        .expect("register should not error");

    service.store().set_active("bob", false);

    let denied = service
        .authenticate(&login_request("bob", "pw123456"))
        .await
        .expect("authenticate should not error");
    assert!(denied.is_none());
}

#[tokio::test]
async fn test_username_is_case_sensitive_at_login() {
    let service = service();
    service
        .register(&register_request("Alice", "pw123456"))
        .await
        .expect("register should not error");

    let denied = service
        .authenticate(&login_request("alice", "pw123456"))
        .await
        .expect("authenticate should not error");
    assert!(denied.is_none());
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let service = service();

    let first = service
        .register(&register_request("alice", "secret1"))
        .await
        .expect("register should not error");
    assert!(first.success);

    let second = service
        .register(&register_request("alice", "secret2"))
        .await
        .expect("register should not error");
    assert!(!second.success);
    assert_eq!(second.message, "Username is already taken");

    // Exactly one credential for "alice" remains
    assert_eq!(service.store().credential_count(), 1);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let service = service();

    let first = service
        .register(&RegisterRequest {
            email: Some("shared@example.com".to_string()),
            ..register_request("alice", "pw123456")
        })
        .await
        .expect("register should not error");
    assert!(first.success);

    let second = service
        .register(&RegisterRequest {
            email: Some("shared@example.com".to_string()),
            ..register_request("bob", "pw123456")
        })
        .await
        .expect("register should not error");
    assert!(!second.success);
    assert_eq!(second.message, "Email is already in use");
}

#[tokio::test]
async fn test_roles_are_a_snapshot_not_a_live_reference() {
    let service = service();
    service
        .register(&register_request("bob", "pw123456"))
        .await
        .expect("register should not error");

    let session = service
        .authenticate(&login_request("bob", "pw123456"))
        .await
        .expect("authenticate should not error")
        .expect("login should succeed");

    // Grant a second role after issuance
    let store = service.store();
    let bob = store
        .find_by_username("bob")
        .await
        .expect("lookup should not error")
        .expect("credential should exist");
    let admin = store
        .find_role_by_name("Admin")
        .await
        .expect("lookup should not error")
        .expect("role should be seeded");
    store
        .assign_role(bob.id, admin.id, chrono::Utc::now())
        .await
        .expect("assign should not error");

    // The already-issued token still carries only the snapshot
    let claims = service
        .tokens()
        .validate(&session.token)
        .expect("token should validate");
    assert_eq!(claims.roles, vec!["User".to_string()]);

    // Re-authentication picks up the new role
    let fresh = service
        .authenticate(&login_request("bob", "pw123456"))
        .await
        .expect("authenticate should not error")
        .expect("login should succeed");
    assert!(fresh.roles.contains(&"Admin".to_string()));
}
