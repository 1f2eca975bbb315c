use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::auth::error::{AuthError, AuthResult};

/// Environment variable pointing at a service-account JSON key file.
pub const CREDENTIALS_ENV_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Identity and signing key of a Google service account.
///
/// The fields match the JSON key file downloaded from the Cloud console, so the struct
/// can be deserialized straight from it; unrelated keys in the file are ignored.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountCredentials {
    pub fn new(client_email: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: normalize_private_key(&private_key.into()),
            project_id: None,
            token_uri: None,
        }
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn from_json_str(json: &str) -> AuthResult<Self> {
        let mut credentials: Self = serde_json::from_str(json)
            .map_err(|err| AuthError::InvalidCredential(format!("Malformed service account JSON: {err}")))?;
        if credentials.client_email.trim().is_empty() {
            return Err(AuthError::InvalidCredential(
                "Service account JSON has an empty client_email".into(),
            ));
        }
        credentials.private_key = normalize_private_key(&credentials.private_key);
        Ok(credentials)
    }

    pub fn from_file(path: impl AsRef<Path>) -> AuthResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|err| {
            AuthError::InvalidCredential(format!("Failed to read {}: {err}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    /// Loads the key file named by `GOOGLE_APPLICATION_CREDENTIALS`.
    pub fn from_env() -> AuthResult<Self> {
        let path = std::env::var(CREDENTIALS_ENV_VAR).map_err(|_| {
            AuthError::InvalidCredential(format!(
                "{CREDENTIALS_ENV_VAR} must point at a service account JSON key file"
            ))
        })?;
        Self::from_file(path)
    }
}

impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Keys pasted into environment variables or script properties often carry literal
/// `\n` sequences instead of line breaks, which PEM parsing rejects.
fn normalize_private_key(key: &str) -> String {
    key.replace("\\n", "\n")
}
