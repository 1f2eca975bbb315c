use std::fmt::{Display, Formatter};

use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportErrorCode {
    /// The remote service answered with an error envelope or a non-success status.
    Remote,
    /// The request never produced a response.
    Network,
    /// The response body could not be read as JSON.
    Decode,
}

impl TransportErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorCode::Remote => "transport/remote",
            TransportErrorCode::Network => "transport/network",
            TransportErrorCode::Decode => "transport/decode",
        }
    }
}

#[derive(Clone, Debug)]
pub struct TransportError {
    pub code: TransportErrorCode,
    pub status: Option<u16>,
    message: String,
}

impl TransportError {
    pub fn new(code: TransportErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.status == Some(401)
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for TransportError {}

pub type TransportResult<T> = Result<T, TransportError>;

pub fn remote_error(message: impl Into<String>) -> TransportError {
    TransportError::new(TransportErrorCode::Remote, message)
}

pub fn network_error(message: impl Into<String>) -> TransportError {
    TransportError::new(TransportErrorCode::Network, message)
}

pub fn decode_error(message: impl Into<String>) -> TransportError {
    TransportError::new(TransportErrorCode::Decode, message)
}

/// Returns the error message carried by a Google API error envelope, if any.
///
/// Both `{"error": {"message": ..}}` and the array form `[{"error": {..}}, ..]` returned
/// by streaming endpoints such as `runQuery` are recognised. The OAuth token endpoint's
/// `{"error": "invalid_grant", "error_description": ".."}` shape is handled too.
pub fn extract_error_message(body: &JsonValue) -> Option<String> {
    let candidate = match body {
        JsonValue::Array(entries) => entries.first()?,
        other => other,
    };
    let error = candidate.get("error")?;
    match error {
        JsonValue::Null | JsonValue::Bool(false) => None,
        JsonValue::String(code) => Some(
            candidate
                .get("error_description")
                .and_then(JsonValue::as_str)
                .map(|description| format!("{code}: {description}"))
                .unwrap_or_else(|| code.clone()),
        ),
        JsonValue::Object(fields) => Some(
            fields
                .get("message")
                .and_then(JsonValue::as_str)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
                .or_else(|| {
                    fields
                        .get("status")
                        .and_then(JsonValue::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| "Unknown error".to_string()),
        ),
        other => Some(other.to_string()),
    }
}

/// Fails when `body` carries an error envelope, whatever the HTTP status was.
pub fn check_for_error(body: &JsonValue) -> TransportResult<()> {
    match extract_error_message(body) {
        Some(message) => Err(remote_error(message)),
        None => Ok(()),
    }
}
