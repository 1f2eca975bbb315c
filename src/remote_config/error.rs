use std::fmt::{Display, Formatter};

use crate::transport::{TransportError, TransportErrorCode};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteConfigErrorCode {
    RemoteError,
    Unauthenticated,
    Internal,
}

impl RemoteConfigErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteConfigErrorCode::RemoteError => "remote-config/remote-error",
            RemoteConfigErrorCode::Unauthenticated => "remote-config/unauthenticated",
            RemoteConfigErrorCode::Internal => "remote-config/internal",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RemoteConfigError {
    pub code: RemoteConfigErrorCode,
    message: String,
}

impl RemoteConfigError {
    pub fn new(code: RemoteConfigErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for RemoteConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for RemoteConfigError {}

impl From<TransportError> for RemoteConfigError {
    fn from(error: TransportError) -> Self {
        match error.code {
            TransportErrorCode::Remote if error.is_unauthenticated() => unauthenticated(error.message()),
            TransportErrorCode::Remote => remote_error(error.message()),
            TransportErrorCode::Network | TransportErrorCode::Decode => internal_error(error.message()),
        }
    }
}

pub type RemoteConfigResult<T> = Result<T, RemoteConfigError>;

pub fn remote_error(message: impl Into<String>) -> RemoteConfigError {
    RemoteConfigError::new(RemoteConfigErrorCode::RemoteError, message)
}

pub fn unauthenticated(message: impl Into<String>) -> RemoteConfigError {
    RemoteConfigError::new(RemoteConfigErrorCode::Unauthenticated, message)
}

pub fn internal_error(message: impl Into<String>) -> RemoteConfigError {
    RemoteConfigError::new(RemoteConfigErrorCode::Internal, message)
}
