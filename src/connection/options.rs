use std::time::Duration;

use crate::auth::DEFAULT_TOKEN_URL;
use crate::firestore::constants::{FIRESTORE_API_URL, FIRESTORE_EMULATOR_HOST_ENV};
use crate::remote_config::constants::REMOTE_CONFIG_API_URL;
use crate::transport::{HttpTransport, TransportResult};

/// Overrides the OAuth token endpoint, e.g. for a local token stub.
pub const TOKEN_URL_ENV: &str = "FIREBASE_TOKEN_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoints and HTTP settings used by a [`super::FirebaseConnection`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub token_url: String,
    pub firestore_host: String,
    pub remote_config_host: String,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            firestore_host: FIRESTORE_API_URL.to_string(),
            remote_config_host: REMOTE_CONFIG_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }
}

impl ConnectionOptions {
    /// Defaults, adjusted by `FIRESTORE_EMULATOR_HOST` and `FIREBASE_TOKEN_URL` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(host) = lookup(FIRESTORE_EMULATOR_HOST_ENV).filter(|host| !host.trim().is_empty()) {
            log::debug!("using Firestore emulator at {host}");
            options = options.with_emulator_host(host.trim());
        }
        if let Some(url) = lookup(TOKEN_URL_ENV).filter(|url| !url.trim().is_empty()) {
            options.token_url = url.trim().to_string();
        }
        options
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_firestore_host(mut self, host: impl Into<String>) -> Self {
        self.firestore_host = host.into();
        self
    }

    /// Points Firestore at an emulator given as `host:port`; a scheme may be included.
    pub fn with_emulator_host(mut self, host: &str) -> Self {
        self.firestore_host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };
        self
    }

    pub fn with_remote_config_host(mut self, host: impl Into<String>) -> Self {
        self.remote_config_host = host.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub(crate) fn build_transport(&self) -> TransportResult<HttpTransport> {
        let mut builder = HttpTransport::builder().with_timeout(self.timeout);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.with_user_agent(user_agent.clone());
        }
        builder.build()
    }
}
