use auth::AuthenticationError;
use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all authentication operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email: {0}")]
    Validation(#[from] EmailError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Credential store error: {0}")]
    Store(String),

    #[error("No credential registered for {0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed authorization header")]
    MalformedHeader,

    #[error("{0}")]
    Token(#[from] TokenError),
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Hashing(err.to_string())
    }
}

impl From<AuthenticationError> for AuthError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            AuthenticationError::PasswordError(e) => e.into(),
            AuthenticationError::TokenError(e) => e.into(),
        }
    }
}
