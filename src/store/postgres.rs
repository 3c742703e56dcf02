/// PostgreSQL identity store
///
/// Production implementation of [`IdentityStore`] backed by sqlx. Uniqueness
/// of usernames and email addresses is enforced by unique constraints in the
/// schema (see `migrations/`), so a concurrent duplicate insert always
/// surfaces as [`StoreError::Duplicate`] regardless of any service-level
/// pre-check.
///
/// # Example
///
/// ```no_run
/// use trackdesk_auth::config::DatabaseConfig;
/// use trackdesk_auth::store::PgIdentityStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     max_connections: 10,
/// };
/// let store = PgIdentityStore::connect(&config).await?;
/// # Ok(())
/// # }
/// ```
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::models::{Credential, NewCredential, Role};
use crate::store::{IdentityStore, StoreError};

/// Identity store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    /// Connects to PostgreSQL, verifies connectivity and runs migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable or a migration fails.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .test_before_acquire(true)
            .connect(&config.url)
            .await?;

        // Fail fast on an unreachable database
        sqlx::query("SELECT 1").execute(&pool).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(format!("migration failed: {}", e)))?;

        info!(
            max_connections = config.max_connections,
            "identity store connected"
        );

        Ok(Self { pool })
    }

    /// Wraps an existing pool (e.g. one shared with the task service)
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            SELECT id, username, password_hash, email, is_active, created_at, updated_at
            FROM credentials
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credential)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM credentials WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM credentials WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn insert(&self, data: NewCredential) -> Result<Credential, StoreError> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            INSERT INTO credentials (username, password_hash, email)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, email, is_active, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .bind(data.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(credential)
    }

    async fn role_names(&self, credential_id: Uuid) -> Result<Vec<String>, StoreError> {
        let names: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT r.name
            FROM role_assignments ra
            JOIN roles r ON r.id = ra.role_id
            WHERE ra.credential_id = $1
            ORDER BY ra.assigned_at
            "#,
        )
        .bind(credential_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(names.into_iter().map(|(name,)| name).collect())
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, description
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    async fn assign_role(
        &self,
        credential_id: Uuid,
        role_id: Uuid,
        assigned_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO role_assignments (credential_id, role_id, assigned_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (credential_id, role_id) DO NOTHING
            "#,
        )
        .bind(credential_id)
        .bind(role_id)
        .bind(assigned_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
