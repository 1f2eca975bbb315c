use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value as JsonValue;

use super::{HttpRequest, Method, RequestBody, TransportArc, TransportResult};

/// Everything but RFC 3986 unreserved characters is escaped inside a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// A request template bound to a base URL and an optional bearer token.
///
/// Query parameters accumulate through [`RestRequest::add_param`] and are sent with the
/// next call. Clone the template to fire several requests from the same base
/// configuration without sharing parameters.
#[derive(Clone)]
pub struct RestRequest {
    transport: TransportArc,
    base_url: String,
    auth_token: Option<String>,
    params: Vec<(String, String)>,
}

impl RestRequest {
    pub fn new(transport: TransportArc, base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            auth_token,
            params: Vec::new(),
        }
    }

    /// Appends a query parameter. Repeated keys are kept, in order.
    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get(&self, path: &str) -> TransportResult<JsonValue> {
        self.send(Method::GET, self.url_for(path), RequestBody::Empty)
    }

    pub fn post(&self, path: &str, body: Option<JsonValue>) -> TransportResult<JsonValue> {
        let body = body.map(RequestBody::Json).unwrap_or(RequestBody::Empty);
        self.send(Method::POST, self.url_for(path), body)
    }

    /// Posts to a custom method on the resource at `path`, e.g. `documents:runQuery`.
    pub fn post_method(&self, path: &str, method: &str, body: Option<JsonValue>) -> TransportResult<JsonValue> {
        let body = body.map(RequestBody::Json).unwrap_or(RequestBody::Empty);
        self.send(Method::POST, format!("{}:{method}", self.url_for(path)), body)
    }

    pub fn post_form(&self, path: &str, form: Vec<(String, String)>) -> TransportResult<JsonValue> {
        self.send(Method::POST, self.url_for(path), RequestBody::Form(form))
    }

    pub fn patch(&self, path: &str, body: Option<JsonValue>) -> TransportResult<JsonValue> {
        let body = body.map(RequestBody::Json).unwrap_or(RequestBody::Empty);
        self.send(Method::PATCH, self.url_for(path), body)
    }

    /// Issues a DELETE.
    pub fn remove(&self, path: &str) -> TransportResult<JsonValue> {
        self.send(Method::DELETE, self.url_for(path), RequestBody::Empty)
    }

    /// Joins `path` onto the base URL, percent-encoding each segment so ids holding
    /// `#`, `?` or `%` stay inside the path. Empty segments are skipped.
    pub fn url_for(&self, path: &str) -> String {
        let mut segments = path.split('/').filter(|segment| !segment.is_empty()).peekable();
        if segments.peek().is_none() {
            return self.base_url.clone();
        }
        let mut url = self.base_url.trim_end_matches('/').to_string();
        for segment in segments {
            url.push('/');
            url.extend(utf8_percent_encode(segment, PATH_SEGMENT));
        }
        url
    }

    fn send(&self, method: Method, url: String, body: RequestBody) -> TransportResult<JsonValue> {
        let request = HttpRequest {
            method,
            url,
            query: self.params.clone(),
            bearer_token: self.auth_token.clone(),
            body,
        };
        log::debug!("{} {}", request.method, request.url);
        self.transport.execute(&request)
    }
}

impl fmt::Debug for RestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestRequest")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.auth_token.is_some())
            .field("params", &self.params)
            .finish()
    }
}
