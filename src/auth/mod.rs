/// Authentication primitives and orchestration
///
/// # Modules
///
/// - [`password`]: PBKDF2-HMAC-SHA256 credential hashing and verification
/// - [`jwt`]: HS256 token issuance and validation with role claims
/// - [`service`]: login/registration orchestration over an identity store
///
/// # Security Features
///
/// - **Password Hashing**: PBKDF2-HMAC-SHA256, 10,000 iterations, 16-byte salt
/// - **Constant-time Comparison**: derived keys compared with `subtle`
/// - **Tokens**: HS256 with issuer/audience/expiry checks and zero clock skew
/// - **Enumeration Safety**: every login denial is structurally identical
pub mod jwt;
pub mod password;
pub mod service;

pub use jwt::{Claims, IssuedToken, TokenError, TokenService};
pub use password::{hash_password, verify_password, PasswordError};
pub use service::{AuthError, AuthService, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
