//! Authentication ports.

/// Claims carried by a session token. The email is the only identity claim.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub email: String,
    pub exp: i64,
}

/// Token service trait for signing and verifying session tokens.
///
/// Verification is stateless: signature and expiry only, no revocation list.
pub trait TokenService: Send + Sync {
    /// Issue a signed token bound to `email`.
    fn generate_token(&self, email: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
