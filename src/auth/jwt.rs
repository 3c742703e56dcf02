/// JWT token issuance and validation module
///
/// Tokens are signed with HS256 (HMAC-SHA256) and carry the authenticated
/// username plus a snapshot of the user's role names. Validation enforces
/// signature, issuer, audience, expiry and not-before with zero clock-skew
/// tolerance, and rejects any token whose header algorithm is not exactly
/// HS256 (algorithm-substitution defense).
///
/// Tokens are stateless: no server-side record is kept, and validity is
/// determined entirely by the signature and the embedded timestamps.
///
/// # Example
///
/// ```
/// use trackdesk_auth::auth::jwt::TokenService;
/// use trackdesk_auth::config::JwtConfig;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = JwtConfig {
///     secret: "test-secret-key-at-least-32-bytes-long".to_string(),
///     ..Default::default()
/// };
/// let tokens = TokenService::new(config)?;
///
/// let issued = tokens.issue("alice", &["User".to_string()])?;
/// let claims = tokens.validate(&issued.token).expect("token should validate");
/// assert_eq!(claims.sub, "alice");
/// assert_eq!(claims.roles, vec!["User".to_string()]);
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

/// Error type for token issuance
///
/// Validation failures never surface as errors; see [`TokenService::validate`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// No signing secret configured (fatal, startup-adjacent)
    #[error("JWT signing secret is not configured")]
    MissingSecret,

    /// Failed to encode the token
    #[error("failed to create token: {0}")]
    CreateError(String),
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (username)
/// - `jti`: Token identifier, random per issuance (advisory, replay-log correlation)
/// - `iss` / `aud`: Issuer and audience strings from configuration
/// - `iat` / `nbf` / `exp`: Issued-at, not-before (= iat), expiration
///
/// # Custom Claims
///
/// - `roles`: Role names embedded at issuance time (a snapshot, not a live
///   reference — role changes do not affect already-issued tokens)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - username
    pub sub: String,

    /// Token identifier, unique per issuance
    pub jti: Uuid,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp, equal to `iat`)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Role names held by the subject at issuance
    pub roles: Vec<String>,
}

impl Claims {
    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// A freshly issued token together with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact, URL-safe signed token
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates HS256-signed tokens for a single issuer/audience pair
///
/// Construction fails fast when no signing secret is configured; a missing
/// secret is a deployment defect, not a per-request condition.
pub struct TokenService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a token service from configuration
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MissingSecret`] if the signing secret is empty.
    pub fn new(config: JwtConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Only HS256 is accepted at decode time; a token whose header names
        // any other algorithm fails before signature verification.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Configured token lifetime
    pub fn lifetime(&self) -> Duration {
        Duration::minutes(self.config.lifetime_minutes)
    }

    /// Issues a signed token for `subject` carrying the given role names
    ///
    /// Equivalent to [`TokenService::issue_at`] with the current time.
    pub fn issue(&self, subject: &str, roles: &[String]) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, roles, Utc::now())
    }

    /// Issues a signed token as of an explicit issuance instant
    ///
    /// The claim set contains the subject, a random `jti`, issuer/audience
    /// from configuration, `iat = nbf = now` and
    /// `exp = now + lifetime_minutes`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::CreateError`] if encoding fails.
    pub fn issue_at(
        &self,
        subject: &str,
        roles: &[String],
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = now + self.lifetime();

        let claims = Claims {
            sub: subject.to_string(),
            jti: Uuid::new_v4(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            roles: roles.to_vec(),
        };

        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::CreateError(format!("token encoding failed: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validates a token and extracts its claims
    ///
    /// Verifies:
    /// - Signature under the configured secret
    /// - Header algorithm is exactly HS256
    /// - Issuer and audience match configuration
    /// - Current time lies inside `[nbf, exp)` with zero leeway
    ///
    /// Any failure collapses to `None`: callers treat absence as
    /// "unauthenticated" and never learn which check failed. The rejection
    /// reason is logged at debug level for internal diagnosis.
    pub fn validate(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(reason = %e, "token rejected");
                None
            }
        }
    }
}
