//! Credentials and project binding for the Firestore and Remote Config stores.
//!
//! A [`FirebaseConnection`] creates each store on first use, issuing a bearer token
//! scoped to that service, and hands out the same store afterwards. Tokens are never
//! refreshed behind the caller's back; call [`FirebaseConnection::reauthenticate`] once
//! they have expired.
//!
//! ```no_run
//! use firebase_rest_sdk::auth::ServiceAccountCredentials;
//! use firebase_rest_sdk::connection::{ConnectionOptions, FirebaseConnection};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = ServiceAccountCredentials::from_env()?;
//! let connection = FirebaseConnection::with_options(credentials, "my-project", ConnectionOptions::from_env())?;
//! let post = connection.firestore()?.get_document("posts/hello")?;
//! let template = connection.remote_config()?.get()?;
//! println!("{} / {}", post.id(), template["version"]["versionNumber"]);
//! # Ok(())
//! # }
//! ```

mod error;
mod options;

use std::sync::Arc;

use once_cell::unsync::OnceCell;

use crate::auth::{AuthToken, ServiceAccountCredentials, TokenIssuer, DATASTORE_SCOPE, REMOTE_CONFIG_SCOPE};
use crate::firestore::DocumentStore;
use crate::remote_config::ConfigStore;
use crate::transport::TransportArc;

pub use error::{ConnectionError, ConnectionResult};
pub use options::{ConnectionOptions, TOKEN_URL_ENV};

pub struct FirebaseConnection {
    credentials: ServiceAccountCredentials,
    project_id: String,
    options: ConnectionOptions,
    transport: TransportArc,
    issuer: TokenIssuer,
    firestore: OnceCell<DocumentStore>,
    remote_config: OnceCell<ConfigStore>,
}

impl FirebaseConnection {
    pub fn new(credentials: ServiceAccountCredentials, project_id: impl Into<String>) -> ConnectionResult<Self> {
        Self::with_options(credentials, project_id, ConnectionOptions::default())
    }

    /// Connection for the project named in the credentials file.
    pub fn from_credentials(credentials: ServiceAccountCredentials) -> ConnectionResult<Self> {
        let project_id = credentials
            .project_id
            .clone()
            .filter(|project_id| !project_id.is_empty())
            .ok_or_else(|| ConnectionError::InvalidConfiguration("Credentials do not name a project_id".into()))?;
        Self::with_options(credentials, project_id, ConnectionOptions::from_env())
    }

    pub fn with_options(
        credentials: ServiceAccountCredentials,
        project_id: impl Into<String>,
        options: ConnectionOptions,
    ) -> ConnectionResult<Self> {
        let transport = options.build_transport()?;
        Ok(Self::with_transport(credentials, project_id, options, Arc::new(transport)))
    }

    /// Connection whose token requests and store requests all go through `transport`.
    pub fn with_transport(
        credentials: ServiceAccountCredentials,
        project_id: impl Into<String>,
        options: ConnectionOptions,
        transport: TransportArc,
    ) -> Self {
        Self {
            credentials,
            project_id: project_id.into(),
            options,
            issuer: TokenIssuer::new(transport.clone()),
            transport,
            firestore: OnceCell::new(),
            remote_config: OnceCell::new(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// The Firestore store, created with a datastore-scoped token on first call.
    pub fn firestore(&self) -> ConnectionResult<&DocumentStore> {
        self.firestore.get_or_try_init(|| {
            let token = self.issue_token(DATASTORE_SCOPE)?;
            Ok(DocumentStore::with_transport(
                self.transport.clone(),
                &self.options.firestore_host,
                token.value(),
                self.project_id.clone(),
            ))
        })
    }

    /// The Remote Config store, created with a remote-config-scoped token on first call.
    pub fn remote_config(&self) -> ConnectionResult<&ConfigStore> {
        self.remote_config.get_or_try_init(|| {
            let token = self.issue_token(REMOTE_CONFIG_SCOPE)?;
            Ok(ConfigStore::with_transport(
                self.transport.clone(),
                &self.options.remote_config_host,
                token.value(),
                self.project_id.clone(),
            ))
        })
    }

    /// Drops both stores so the next access issues fresh tokens.
    pub fn reauthenticate(&mut self) {
        log::debug!("discarding cached stores for project {}", self.project_id);
        self.firestore.take();
        self.remote_config.take();
    }

    fn issue_token(&self, scope: &str) -> ConnectionResult<AuthToken> {
        log::debug!("issuing {scope} token for project {}", self.project_id);
        Ok(self
            .issuer
            .issue_token(&self.credentials, &self.options.token_url, scope)?)
    }
}

impl std::fmt::Debug for FirebaseConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConnection")
            .field("project_id", &self.project_id)
            .field("client_email", &self.credentials.client_email)
            .field("options", &self.options)
            .field("firestore", &self.firestore.get().is_some())
            .field("remote_config", &self.remote_config.get().is_some())
            .finish()
    }
}
