//! Signed JWT assertion used for the OAuth 2.0 service-account flow.
//!
//! See <https://developers.google.com/identity/protocols/oauth2/service-account#authorizingrequests>.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey};
use serde::{Deserialize, Serialize};

use crate::auth::error::{AuthError, AuthResult};

/// Validity window requested for every assertion.
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct AssertionHeader {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: AssertionHeader = AssertionHeader {
    alg: "RS256",
    typ: "JWT",
};

/// Claim set of the assertion, serialized in this field order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub scope: String,
}

impl AssertionClaims {
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        scope: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let iat = now.timestamp();
        Self {
            aud: audience.into(),
            exp: iat + ASSERTION_LIFETIME_SECS,
            iat,
            iss: issuer.into(),
            scope: scope.into(),
        }
    }
}

/// `base64url(header) + "." + base64url(claims)`, both without padding.
pub fn signing_input(claims: &AssertionClaims) -> AuthResult<String> {
    let header = serde_json::to_vec(&HEADER)
        .map_err(|err| AuthError::InvalidCredential(format!("Failed to encode JWT header: {err}")))?;
    let claims = serde_json::to_vec(claims)
        .map_err(|err| AuthError::InvalidCredential(format!("Failed to encode JWT claims: {err}")))?;
    Ok(format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(claims)
    ))
}

/// Signs the claims with RSA-SHA256 and returns the compact assertion.
pub fn sign_assertion(claims: &AssertionClaims, private_key_pem: &str) -> AuthResult<String> {
    let input = signing_input(claims)?;
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|err| AuthError::InvalidCredential(format!("Unusable RSA private key: {err}")))?;
    // Already base64url without padding.
    let signature = jsonwebtoken::crypto::sign(input.as_bytes(), &key, Algorithm::RS256)
        .map_err(|err| AuthError::InvalidCredential(format!("Failed to sign assertion: {err}")))?;
    Ok(format!("{input}.{signature}"))
}
