//! Password hashing port.

/// Password hashing service.
///
/// Implementations must salt every hash, so hashing the same plaintext twice
/// yields two different strings.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash. A mismatch is `Ok(false)`.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Hashing error: {0}")]
    Hashing(String),
}
