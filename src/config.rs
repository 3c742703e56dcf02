/// Configuration management for the authentication core
///
/// This module loads configuration from environment variables and provides
/// type-safe configuration structs. The crate does not own the configuration
/// surface — the embedding application does — but this is the canonical way
/// to populate it.
///
/// # Environment Variables
///
/// - `JWT_SECRET`: Secret key for token signing (required, at least 32 bytes)
/// - `JWT_ISSUER`: Token issuer string (default: "trackdesk")
/// - `JWT_AUDIENCE`: Token audience string (default: "trackdesk")
/// - `TOKEN_LIFETIME_MINUTES`: Token lifetime (default: 60)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
///
/// # Example
///
/// ```no_run
/// use trackdesk_auth::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Tokens issued by {}", config.jwt.issuer);
/// # Ok(())
/// # }
/// ```
use serde::{Deserialize, Serialize};
use std::env;

/// Complete configuration for the authentication core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Database configuration
    pub database: DatabaseConfig,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Issuer string stamped into and checked on every token
    pub issuer: String,

    /// Audience string stamped into and checked on every token
    pub audience: String,

    /// Token lifetime in minutes
    pub lifetime_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: "trackdesk".to_string(),
            audience: "trackdesk".to_string(),
            lifetime_minutes: 60,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` or `DATABASE_URL` is missing
    /// - `JWT_SECRET` is shorter than 32 bytes
    /// - Numeric variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "trackdesk".to_string());
        let audience = env::var("JWT_AUDIENCE").unwrap_or_else(|_| "trackdesk".to_string());

        let lifetime_minutes = env::var("TOKEN_LIFETIME_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<i64>()?;

        if lifetime_minutes <= 0 {
            anyhow::bail!("TOKEN_LIFETIME_MINUTES must be positive");
        }

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        Ok(Self {
            jwt: JwtConfig {
                secret: jwt_secret,
                issuer,
                audience,
                lifetime_minutes,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_defaults() {
        let config = JwtConfig::default();

        assert!(config.secret.is_empty());
        assert_eq!(config.issuer, "trackdesk");
        assert_eq!(config.audience, "trackdesk");
        assert_eq!(config.lifetime_minutes, 60);
    }
}
