//! Blocking JSON-over-HTTP plumbing shared by every service client.
//!
//! Services never talk to `reqwest` directly: they build a [`RestRequest`] bound to a
//! base URL and bearer token, and the request hands a fully described [`HttpRequest`] to
//! whatever [`Transport`] it was created with. The default transport is
//! [`HttpTransport`]; tests swap in scripted transports.

pub mod error;
mod http;
mod request;

use std::sync::Arc;

pub use reqwest::Method;
use serde_json::Value as JsonValue;

pub use error::{TransportError, TransportErrorCode, TransportResult};
pub use http::{HttpTransport, HttpTransportBuilder};
pub use request::RestRequest;

/// Body attached to an outgoing request.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(JsonValue),
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
}

/// A fully resolved request, ready to be sent by a [`Transport`].
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub bearer_token: Option<String>,
    pub body: RequestBody,
}

impl HttpRequest {
    /// Returns every value of the query parameter `key`, in insertion order.
    pub fn query_values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn json_body(&self) -> Option<&JsonValue> {
        match &self.body {
            RequestBody::Json(body) => Some(body),
            _ => None,
        }
    }
}

/// Sends a request and returns the decoded JSON body.
///
/// Implementations must turn a Google error envelope into an error regardless of the
/// HTTP status (see [`error::check_for_error`]).
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> TransportResult<JsonValue>;
}

pub type TransportArc = Arc<dyn Transport>;
