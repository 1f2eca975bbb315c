use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::remote_config::constants::REMOTE_CONFIG_API_URL;
use crate::remote_config::error::RemoteConfigResult;
use crate::transport::{HttpTransport, RestRequest, TransportArc};

/// Read-only access to a project's Remote Config template.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    request: RestRequest,
}

impl ConfigStore {
    pub fn new(auth_token: impl Into<String>, project_id: impl Into<String>) -> RemoteConfigResult<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(
            Arc::new(transport),
            REMOTE_CONFIG_API_URL,
            auth_token,
            project_id,
        ))
    }

    pub fn with_transport(
        transport: TransportArc,
        host: &str,
        auth_token: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        let base_url = format!(
            "{}/v1/projects/{}/remoteConfig",
            host.trim_end_matches('/'),
            project_id.into()
        );
        Self {
            request: RestRequest::new(transport, base_url, Some(auth_token.into())),
        }
    }

    pub fn base_url(&self) -> &str {
        self.request.base_url()
    }

    /// Fetches the current template. The body is returned as the service sent it.
    pub fn get(&self) -> RemoteConfigResult<JsonValue> {
        Ok(self.request.clone().get("")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote_config::error::RemoteConfigErrorCode;
    use crate::test_support::{start_mock_server, RecordingTransport};
    use crate::transport::error::remote_error;
    use crate::transport::Method;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::panic;

    #[test]
    fn returns_template_unchanged() {
        let transport = Arc::new(RecordingTransport::new());
        let template = json!({
            "conditions": [],
            "parameters": { "welcome": { "defaultValue": { "value": "hi" } } },
            "version": { "versionNumber": "7" }
        });
        transport.push_response(template.clone());

        let store = ConfigStore::with_transport(transport.clone(), REMOTE_CONFIG_API_URL, "token", "demo");
        assert_eq!(store.get().unwrap(), template);

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(
            sent[0].url,
            "https://firebaseremoteconfig.googleapis.com/v1/projects/demo/remoteConfig"
        );
        assert_eq!(sent[0].bearer_token.as_deref(), Some("token"));
    }

    #[test]
    fn expired_token_is_unauthenticated() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_result(Err(remote_error("Request had invalid authentication credentials.").with_status(401)));
        let store = ConfigStore::with_transport(transport, REMOTE_CONFIG_API_URL, "stale", "demo");

        let err = store.get().unwrap_err();
        assert_eq!(err.code, RemoteConfigErrorCode::Unauthenticated);
    }

    #[test]
    fn fetches_template_over_http() {
        let server = match panic::catch_unwind(start_mock_server) {
            Ok(server) => server,
            Err(_) => {
                eprintln!("Skipping fetches_template_over_http: unable to bind httpmock server.");
                return;
            }
        };
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/projects/demo/remoteConfig")
                .header("authorization", "Bearer token");
            then.status(200).json_body(json!({ "parameters": {} }));
        });

        let transport = Arc::new(HttpTransport::new().unwrap());
        let store = ConfigStore::with_transport(transport, &server.base_url(), "token", "demo");
        assert_eq!(store.get().unwrap(), json!({ "parameters": {} }));
        mock.assert();
    }

    #[test]
    fn permission_error_over_http() {
        let server = match panic::catch_unwind(start_mock_server) {
            Ok(server) => server,
            Err(_) => {
                eprintln!("Skipping permission_error_over_http: unable to bind httpmock server.");
                return;
            }
        };
        server.mock(|when, then| {
            when.method(GET).path("/v1/projects/demo/remoteConfig");
            then.status(403)
                .json_body(json!({ "error": { "code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED" } }));
        });

        let transport = Arc::new(HttpTransport::new().unwrap());
        let store = ConfigStore::with_transport(transport, &server.base_url(), "token", "demo");
        let err = store.get().unwrap_err();
        assert_eq!(err.code, RemoteConfigErrorCode::RemoteError);
        assert_eq!(err.message(), "The caller does not have permission");
    }
}
