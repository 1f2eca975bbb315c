use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value as JsonValue;

use crate::transport::error::{check_for_error, TransportResult};
use crate::transport::{HttpRequest, Transport};

/// In-memory [`Transport`] that replays scripted responses and records every request.
///
/// Responses go through the same error-envelope check as the HTTP transport. Running
/// out of scripted responses panics, which makes unexpected extra requests visible.
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<TransportResult<JsonValue>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, body: JsonValue) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    pub fn push_result(&self, result: TransportResult<JsonValue>) {
        self.responses.lock().unwrap().push_back(result);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: &HttpRequest) -> TransportResult<JsonValue> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response for {} {}", request.method, request.url));
        let body = next?;
        check_for_error(&body)?;
        Ok(body)
    }
}
