use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::transport::{TransportError, TransportErrorCode};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FirestoreErrorCode {
    UnsupportedValueType,
    InvalidOperator,
    InvalidArgument,
    NotFound,
    RemoteError,
    Unauthenticated,
    Internal,
}

impl FirestoreErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FirestoreErrorCode::UnsupportedValueType => "firestore/unsupported-value-type",
            FirestoreErrorCode::InvalidOperator => "firestore/invalid-operator",
            FirestoreErrorCode::InvalidArgument => "firestore/invalid-argument",
            FirestoreErrorCode::NotFound => "firestore/not-found",
            FirestoreErrorCode::RemoteError => "firestore/remote-error",
            FirestoreErrorCode::Unauthenticated => "firestore/unauthenticated",
            FirestoreErrorCode::Internal => "firestore/internal",
        }
    }
}

#[derive(Clone, Debug)]
pub struct FirestoreError {
    pub code: FirestoreErrorCode,
    message: String,
}

impl FirestoreError {
    pub fn new(code: FirestoreErrorCode, message: impl Into<String>) -> Self {
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

impl Display for FirestoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl Error for FirestoreError {}

impl From<TransportError> for FirestoreError {
    fn from(error: TransportError) -> Self {
        match error.code {
            TransportErrorCode::Remote if error.is_unauthenticated() => unauthenticated(error.message()),
            TransportErrorCode::Remote => remote_error(error.message()),
            TransportErrorCode::Network | TransportErrorCode::Decode => internal_error(error.message()),
        }
    }
}

pub type FirestoreResult<T> = Result<T, FirestoreError>;

pub fn unsupported_value_type(message: impl Into<String>) -> FirestoreError {
    FirestoreError::new(FirestoreErrorCode::UnsupportedValueType, message)
}

pub fn invalid_operator(operator: &str) -> FirestoreError {
    FirestoreError::new(
        FirestoreErrorCode::InvalidOperator,
        format!("Invalid Operator given: {operator}"),
    )
}

pub fn invalid_argument(message: impl Into<String>) -> FirestoreError {
    FirestoreError::new(FirestoreErrorCode::InvalidArgument, message)
}

pub fn not_found(message: impl Into<String>) -> FirestoreError {
    FirestoreError::new(FirestoreErrorCode::NotFound, message)
}

pub fn remote_error(message: impl Into<String>) -> FirestoreError {
    FirestoreError::new(FirestoreErrorCode::RemoteError, message)
}

pub fn unauthenticated(message: impl Into<String>) -> FirestoreError {
    FirestoreError::new(FirestoreErrorCode::Unauthenticated, message)
}

pub fn internal_error(message: impl Into<String>) -> FirestoreError {
    FirestoreError::new(FirestoreErrorCode::Internal, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::error::{network_error, remote_error as transport_remote_error};

    #[test]
    fn maps_transport_errors() {
        let err: FirestoreError = transport_remote_error("Document not found").into();
        assert_eq!(err.code, FirestoreErrorCode::RemoteError);
        assert_eq!(err.message(), "Document not found");

        let err: FirestoreError = transport_remote_error("expired").with_status(401).into();
        assert_eq!(err.code, FirestoreErrorCode::Unauthenticated);

        let err: FirestoreError = network_error("connection refused").into();
        assert_eq!(err.code, FirestoreErrorCode::Internal);
    }

    #[test]
    fn display_includes_code() {
        let err = invalid_operator("~=");
        assert_eq!(err.to_string(), "Invalid Operator given: ~= (firestore/invalid-operator)");
    }
}
