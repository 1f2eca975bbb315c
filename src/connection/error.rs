use std::fmt;

use crate::auth::AuthError;
use crate::transport::TransportError;

pub type ConnectionResult<T> = Result<T, ConnectionError>;

#[derive(Debug, Clone)]
pub enum ConnectionError {
    /// A scoped token could not be issued.
    Auth(AuthError),
    /// The HTTP client could not be set up.
    Transport(TransportError),
    InvalidConfiguration(String),
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::Auth(err) => write!(f, "Failed to authenticate: {err}"),
            ConnectionError::Transport(err) => write!(f, "Failed to create transport: {err}"),
            ConnectionError::InvalidConfiguration(message) => write!(f, "Invalid configuration: {message}"),
        }
    }
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectionError::Auth(err) => Some(err),
            ConnectionError::Transport(err) => Some(err),
            ConnectionError::InvalidConfiguration(_) => None,
        }
    }
}

impl From<AuthError> for ConnectionError {
    fn from(error: AuthError) -> Self {
        ConnectionError::Auth(error)
    }
}

impl From<TransportError> for ConnectionError {
    fn from(error: TransportError) -> Self {
        ConnectionError::Transport(error)
    }
}
