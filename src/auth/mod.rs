//! Service-account authentication.
//!
//! A [`TokenIssuer`] signs an RS256 assertion with the account's private key and trades
//! it at the OAuth 2.0 token endpoint for a short-lived bearer token scoped to a single
//! API. Tokens are not refreshed; see [`crate::connection::FirebaseConnection::reauthenticate`].
//!
//! ```no_run
//! use firebase_rest_sdk::auth::{ServiceAccountCredentials, TokenIssuer, DATASTORE_SCOPE, DEFAULT_TOKEN_URL};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = ServiceAccountCredentials::from_file("service-account.json")?;
//! let token = TokenIssuer::with_http()?.issue_token(&credentials, DEFAULT_TOKEN_URL, DATASTORE_SCOPE)?;
//! println!("token valid until {}", token.expires_at());
//! # Ok(())
//! # }
//! ```

pub mod assertion;
mod credentials;
mod error;
mod token_issuer;

#[doc(inline)]
pub use credentials::{ServiceAccountCredentials, CREDENTIALS_ENV_VAR};

#[doc(inline)]
pub use error::{AuthError, AuthResult};

#[doc(inline)]
pub use token_issuer::{AuthToken, TokenIssuer, DATASTORE_SCOPE, DEFAULT_TOKEN_URL, REMOTE_CONFIG_SCOPE};
