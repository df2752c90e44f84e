//! Blocking HTTP client backed by reqwest.

use crate::transport::{HttpClient, HttpRequest, HttpResponse, AUTH_HEADER};
use reqwest::header::CONTENT_TYPE;

/// An `HttpClient` that sends requests with `reqwest::blocking`.
///
/// The underlying client pools connections, so one instance can be shared
/// by many transactions through `Arc` or a reference.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a preconfigured reqwest client (timeouts, proxies, TLS).
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl HttpClient for ReqwestClient {
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        let mut builder = self
            .client
            .post(&request.url)
            .header(AUTH_HEADER, &request.auth_token);
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| e.to_string())?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_server_is_transport_error() {
        let client = ReqwestClient::new();
        let request = HttpRequest {
            url: "http://127.0.0.1:9/query".into(),
            auth_token: "key".into(),
            content_type: None,
            body: None,
        };
        assert!(client.post(request).is_err());
    }
}
