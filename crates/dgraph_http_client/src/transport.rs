//! HTTP client abstraction.
//!
//! The handle never talks to the network directly; every exchange goes
//! through an `HttpClient`. This allows different HTTP libraries
//! (reqwest, hyper, ureq, etc.) or an in-memory fake in tests.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

/// Header carrying the API key.
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// An outbound POST request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Full URL including the query string.
    pub url: String,
    /// Value of the `X-Auth-Token` header.
    pub auth_token: String,
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<&'static str>,
    /// Request body, if any.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Returns the path and query string, e.g. `/query?timeout=600s`.
    pub fn target(&self) -> &str {
        let after_scheme = self
            .url
            .find("://")
            .map(|i| &self.url[i + 3..])
            .unwrap_or(&self.url);
        after_scheme
            .find('/')
            .map(|i| &after_scheme[i..])
            .unwrap_or("/")
    }

    /// Returns the path without the query string.
    pub fn path(&self) -> &str {
        let target = self.target();
        target.split_once('?').map(|(p, _)| p).unwrap_or(target)
    }

    /// Returns the raw query string, if any.
    pub fn query_string(&self) -> Option<&str> {
        self.target().split_once('?').map(|(_, q)| q)
    }

    /// Returns the value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_string()?
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    /// Returns the body as UTF-8 text.
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// A response as seen by the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body; may be empty.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response with a raw body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a response with a JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// Returns true for statuses in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport. The client
/// must send a POST with the `X-Auth-Token` header and, when set, the
/// `Content-Type` header. Non-2xx statuses are returned as responses, not
/// errors; `Err` is reserved for failing to obtain a response at all.
pub trait HttpClient {
    /// Sends a POST request and returns the response.
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, String>;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        (**self).post(request)
    }
}

impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        (**self).post(request)
    }
}

/// A mock client for testing.
///
/// Responses are served in the order they were queued; every request is
/// recorded for inspection.
#[derive(Debug, Default)]
pub struct MockHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpClient {
    /// Creates a new mock client with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn push_response(&self, response: HttpResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    /// Queues a JSON response.
    pub fn push_json(&self, status: u16, body: Value) {
        self.push_response(HttpResponse::json(status, &body));
    }

    /// Queues a transport failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.responses.lock().push_back(Err(message.into()));
    }

    /// Returns all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of recorded requests.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }
}

impl HttpClient for MockHttpClient {
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err("no mock response queued".into()))
    }
}
