use std::fmt;

use crate::transport::{TransportError, TransportErrorCode};

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token endpoint rejected the assertion.
    AuthenticationFailed(String),
    /// The service-account credentials are unusable (unreadable file, bad key).
    InvalidCredential(String),
    /// The token endpoint could not be reached or answered with garbage.
    Network(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::AuthenticationFailed(message) => write!(f, "Authentication failed: {message}"),
            AuthError::InvalidCredential(message) => write!(f, "Invalid credential: {message}"),
            AuthError::Network(message) => write!(f, "Network error: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<TransportError> for AuthError {
    fn from(error: TransportError) -> Self {
        match error.code {
            TransportErrorCode::Remote => AuthError::AuthenticationFailed(error.message().to_string()),
            TransportErrorCode::Network | TransportErrorCode::Decode => {
                AuthError::Network(error.message().to_string())
            }
        }
    }
}
