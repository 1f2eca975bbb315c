use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::auth::assertion::{sign_assertion, AssertionClaims, ASSERTION_LIFETIME_SECS};
use crate::auth::credentials::ServiceAccountCredentials;
use crate::auth::error::{AuthError, AuthResult};
use crate::transport::{HttpTransport, RestRequest, TransportArc};

/// Google's OAuth 2.0 token endpoint; also the `aud` of every assertion.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scope granting read/write access to Firestore.
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Scope granting access to the Remote Config template.
pub const REMOTE_CONFIG_SCOPE: &str = "https://www.googleapis.com/auth/firebase.remoteconfig";

const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Bearer token returned by the token endpoint.
///
/// Tokens are never refreshed: once `expires_at` has passed, requests made with it fail
/// with an authentication error and the caller has to issue a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Exchanges a signed service-account assertion for a bearer token.
#[derive(Clone)]
pub struct TokenIssuer {
    transport: TransportArc,
}

impl TokenIssuer {
    pub fn new(transport: TransportArc) -> Self {
        Self { transport }
    }

    /// Issuer backed by a default [`HttpTransport`].
    pub fn with_http() -> AuthResult<Self> {
        let transport = HttpTransport::new().map_err(AuthError::from)?;
        Ok(Self::new(std::sync::Arc::new(transport)))
    }

    /// Issues a token for `scope`, using `audience_url` both as the assertion audience and
    /// as the endpoint the assertion is posted to.
    pub fn issue_token(
        &self,
        credentials: &ServiceAccountCredentials,
        audience_url: &str,
        scope: &str,
    ) -> AuthResult<AuthToken> {
        self.issue_token_at(credentials, audience_url, scope, Utc::now())
    }

    pub fn issue_token_at(
        &self,
        credentials: &ServiceAccountCredentials,
        audience_url: &str,
        scope: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<AuthToken> {
        let claims = AssertionClaims::new(&credentials.client_email, audience_url, scope, now);
        let assertion = sign_assertion(&claims, &credentials.private_key)?;

        log::debug!("requesting access token for {} ({scope})", credentials.client_email);
        let form = vec![
            ("grant_type".to_string(), JWT_BEARER_GRANT_TYPE.to_string()),
            ("assertion".to_string(), assertion),
        ];
        let body = RestRequest::new(self.transport.clone(), audience_url, None).post_form("", form)?;

        let response: TokenResponse = serde_json::from_value(body)
            .map_err(|err| AuthError::Network(format!("Invalid token response: {err}")))?;
        let access_token = response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AuthError::AuthenticationFailed("Token response did not include an access_token".into())
            })?;
        let lifetime = response.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        Ok(AuthToken::new(access_token, now + Duration::seconds(lifetime)))
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}
