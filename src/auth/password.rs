/// Password hashing module using PBKDF2-HMAC-SHA256
///
/// This module turns plaintext passwords into opaque storable blobs and
/// verifies plaintext passwords against them.
///
/// # Security
///
/// - **KDF**: PBKDF2 with HMAC-SHA256
/// - **Iterations**: 10,000
/// - **Salt**: 16 random bytes from the OS CSPRNG
/// - **Output**: 32-byte derived key
/// - **Encoding**: base64 of `salt || derived_key` (48 bytes)
/// - **Comparison**: full-length constant-time equality via `subtle`
///
/// # Example
///
/// ```
/// use trackdesk_auth::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let encoded = hash_password("super_secret_password_123")?;
///
/// assert!(verify_password("super_secret_password_123", &encoded));
/// assert!(!verify_password("wrong_password", &encoded));
/// # Ok(())
/// # }
/// ```
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type PrfHmacSha256 = Hmac<Sha256>;

/// Salt length in bytes
const SALT_LEN: usize = 16;

/// Derived key length in bytes
const KEY_LEN: usize = 32;

/// PBKDF2 iteration count
const ITERATIONS: u32 = 10_000;

/// Error type for password hashing operations
///
/// Note that *verification* never returns an error: a malformed stored blob
/// is indistinguishable from a wrong password to the caller.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Password was empty
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Hashes a password into an opaque encoded blob
///
/// Generates a fresh 16-byte random salt, derives a 32-byte key with
/// PBKDF2-HMAC-SHA256 (10,000 iterations), and returns
/// `base64(salt || derived_key)`.
///
/// # Errors
///
/// Returns [`PasswordError::EmptyPassword`] if `password` is empty.
///
/// # Example
///
/// ```
/// use trackdesk_auth::auth::password::hash_password;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let encoded = hash_password("my_password")?;
/// // 48 raw bytes -> 64 base64 chars
/// assert_eq!(encoded.len(), 64);
/// # Ok(())
/// # }
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::EmptyPassword);
    }

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut derived = [0u8; KEY_LEN];
    pbkdf2::<PrfHmacSha256>(password.as_bytes(), &salt, ITERATIONS, &mut derived)
        .expect("HMAC accepts any key length");

    let mut combined = [0u8; SALT_LEN + KEY_LEN];
    combined[..SALT_LEN].copy_from_slice(&salt);
    combined[SALT_LEN..].copy_from_slice(&derived);

    Ok(BASE64.encode(combined))
}

/// Verifies a password against a stored encoded blob
///
/// Decodes the blob, re-derives a key with the extracted salt and the same
/// iteration count, and compares the result to the stored key in constant
/// time over the full length.
///
/// Returns `false` for any malformed blob (bad base64, wrong length); a
/// corrupted or foreign-format hash is treated exactly like a wrong
/// password.
///
/// # Example
///
/// ```
/// use trackdesk_auth::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let encoded = hash_password("correct_password")?;
/// assert!(verify_password("correct_password", &encoded));
/// assert!(!verify_password("wrong_password", &encoded));
/// assert!(!verify_password("correct_password", "not-a-valid-blob"));
/// # Ok(())
/// # }
/// ```
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let combined = match BASE64.decode(encoded) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    if combined.len() != SALT_LEN + KEY_LEN {
        return false;
    }

    let (salt, stored_key) = combined.split_at(SALT_LEN);

    let mut derived = [0u8; KEY_LEN];
    if pbkdf2::<PrfHmacSha256>(password.as_bytes(), salt, ITERATIONS, &mut derived).is_err() {
        return false;
    }

    // Constant-time, full-length comparison
    derived.ct_eq(stored_key).into()
}
