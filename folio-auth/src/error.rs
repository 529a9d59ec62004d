//! Error types for the auth layer.

use thiserror::Error;

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur while handling credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Hashing failed (bad parameters or salt).
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Stored hash is not a valid PHC string.
    #[error("invalid password hash: {0}")]
    InvalidHash(String),

    /// Credentials are unusable (e.g. empty email).
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}
