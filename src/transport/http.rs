use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value as JsonValue;

use super::error::{check_for_error, decode_error, network_error, remote_error, TransportResult};
use super::{HttpRequest, RequestBody, Transport};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Transport`] backed by a blocking `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

#[derive(Clone, Debug)]
pub struct HttpTransportBuilder {
    client: Option<Client>,
    timeout: Duration,
    user_agent: String,
}

impl HttpTransportBuilder {
    fn new() -> Self {
        Self {
            client: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("firebase-rest-sdk/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> TransportResult<HttpTransport> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout)
                .user_agent(self.user_agent)
                .build()
                .map_err(|err| network_error(format!("Failed to build HTTP client: {err}")))?,
        };
        Ok(HttpTransport { client })
    }
}

impl HttpTransport {
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    pub fn new() -> TransportResult<Self> {
        Self::builder().build()
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &HttpRequest) -> TransportResult<JsonValue> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = request.bearer_token.as_deref() {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, "application/json"),
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Form(pairs) => builder.form(pairs),
        };

        let response = builder
            .send()
            .map_err(|err| network_error(format!("{} {} failed: {err}", request.method, request.url)))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|err| network_error(format!("Failed to read response body: {err}")))?;

        let body = if text.trim().is_empty() {
            JsonValue::Null
        } else {
            match serde_json::from_str::<JsonValue>(&text) {
                Ok(body) => body,
                Err(_) if !status.is_success() => {
                    return Err(remote_error(format!(
                        "Request failed with status {}: {}",
                        status.as_u16(),
                        text.trim()
                    ))
                    .with_status(status.as_u16()));
                }
                Err(err) => return Err(decode_error(format!("Invalid JSON response: {err}"))),
            }
        };

        if let Err(err) = check_for_error(&body) {
            log::warn!("{} {} returned error: {}", request.method, request.url, err.message());
            return Err(err.with_status(status.as_u16()));
        }

        if !status.is_success() {
            return Err(remote_error(format!(
                "Request failed with status {}",
                status.as_u16()
            ))
            .with_status(status.as_u16()));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::start_mock_server;
    use crate::transport::{Method, TransportErrorCode};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::panic;

    fn request(method: Method, url: String, body: RequestBody) -> HttpRequest {
        HttpRequest {
            method,
            url,
            query: Vec::new(),
            bearer_token: Some("secret".into()),
            body,
        }
    }

    #[test]
    fn sends_bearer_token_and_json_body() {
        let server = match panic::catch_unwind(start_mock_server) {
            Ok(server) => server,
            Err(_) => {
                eprintln!("Skipping sends_bearer_token_and_json_body: unable to bind httpmock server.");
                return;
            }
        };
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/docs")
                .header("authorization", "Bearer secret")
                .query_param("documentId", "abc")
                .json_body(json!({ "fields": {} }));
            then.status(200).json_body(json!({ "name": "x" }));
        });

        let transport = HttpTransport::new().unwrap();
        let mut req = request(Method::POST, server.url("/docs"), RequestBody::Json(json!({ "fields": {} })));
        req.query.push(("documentId".into(), "abc".into()));
        let body = transport.execute(&req).unwrap();

        mock.assert();
        assert_eq!(body, json!({ "name": "x" }));
    }

    #[test]
    fn error_envelope_fails_even_with_success_status() {
        let server = match panic::catch_unwind(start_mock_server) {
            Ok(server) => server,
            Err(_) => {
                eprintln!("Skipping error_envelope_fails_even_with_success_status: unable to bind httpmock server.");
                return;
            }
        };
        server.mock(|when, then| {
            when.method(GET).path("/docs");
            then.status(200)
                .json_body(json!([{ "error": { "message": "quota exceeded" } }]));
        });

        let transport = HttpTransport::new().unwrap();
        let err = transport
            .execute(&request(Method::GET, server.url("/docs"), RequestBody::Empty))
            .unwrap_err();
        assert_eq!(err.code, TransportErrorCode::Remote);
        assert_eq!(err.message(), "quota exceeded");
        assert_eq!(err.status, Some(200));
    }

    #[test]
    fn non_success_status_without_envelope_is_remote_error() {
        let server = match panic::catch_unwind(start_mock_server) {
            Ok(server) => server,
            Err(_) => {
                eprintln!("Skipping non_success_status_without_envelope_is_remote_error: unable to bind httpmock server.");
                return;
            }
        };
        server.mock(|when, then| {
            when.method(DELETE).path("/docs/1");
            then.status(503).body("upstream unavailable");
        });

        let transport = HttpTransport::new().unwrap();
        let err = transport
            .execute(&request(Method::DELETE, server.url("/docs/1"), RequestBody::Empty))
            .unwrap_err();
        assert_eq!(err.code, TransportErrorCode::Remote);
        assert_eq!(err.status, Some(503));
    }

    #[test]
    fn empty_body_decodes_to_null() {
        let server = match panic::catch_unwind(start_mock_server) {
            Ok(server) => server,
            Err(_) => {
                eprintln!("Skipping empty_body_decodes_to_null: unable to bind httpmock server.");
                return;
            }
        };
        server.mock(|when, then| {
            when.method(DELETE).path("/docs/1");
            then.status(200);
        });

        let transport = HttpTransport::new().unwrap();
        let body = transport
            .execute(&request(Method::DELETE, server.url("/docs/1"), RequestBody::Empty))
            .unwrap();
        assert_eq!(body, JsonValue::Null);
    }
}
