//! Transports execute an `HttpRequest` and return the full `HttpResponse`.
//!
//! # Design
//! `Transport` is the only seam that touches the network. A response with
//! any status is returned as data; only failures that prevent a response
//! (connect, TLS, timeout) are errors. Deadlines belong to the transport.

use std::time::Duration;

use ureq::Agent;

use crate::error::BoxError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes requests on behalf of `Client`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, BoxError> + Send + Sync,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        self(request)
    }
}

/// Largest response body `UreqTransport` reads; bigger bodies fail the request.
pub const MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Blocking transport backed by a `ureq` agent.
///
/// Response bodies are read in full, up to [`MAX_BODY_BYTES`]. A body that is
/// larger, or that is not valid UTF-8, is reported as a transport error.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Fails any request that takes longer than `timeout` end to end.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        // Non-2xx statuses are data for the validator, not transport errors.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, BoxError> {
        let url = req.url.as_str();
        let body = req.body.as_deref();
        tracing::trace!(method = %req.method, url, has_body = body.is_some(), "ureq request");

        let result = match req.method {
            HttpMethod::Get | HttpMethod::Delete | HttpMethod::Head | HttpMethod::Options => {
                let builder = match req.method {
                    HttpMethod::Get => self.agent.get(url),
                    HttpMethod::Delete => self.agent.delete(url),
                    HttpMethod::Head => self.agent.head(url),
                    _ => self.agent.options(url),
                };
                let builder = with_headers(builder, &req.headers);
                match body {
                    Some(body) => builder.force_send_body().send(body.as_bytes()),
                    None => builder.call(),
                }
            }
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
                let builder = match req.method {
                    HttpMethod::Post => self.agent.post(url),
                    HttpMethod::Put => self.agent.put(url),
                    _ => self.agent.patch(url),
                };
                let builder = with_headers(builder, &req.headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let bytes = response.body_mut().with_config().limit(MAX_BODY_BYTES).read_to_vec()?;
        tracing::trace!(status, len = bytes.len(), "ureq response");
        let body = String::from_utf8(bytes)?;

        Ok(HttpResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_transports() {
        let transport = |req: &HttpRequest| -> Result<HttpResponse, BoxError> {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: req.url.to_string(),
            })
        };
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: url::Url::parse("http://localhost:3000/checks").unwrap(),
            headers: Vec::new(),
            body: None,
        };
        let response = transport.execute(&req).unwrap();
        assert_eq!(response.body, "http://localhost:3000/checks");
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        // Nothing listens on the discard port.
        let transport = UreqTransport::with_timeout(Duration::from_secs(5));
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: url::Url::parse("http://127.0.0.1:9/").unwrap(),
            headers: Vec::new(),
            body: None,
        };
        assert!(transport.execute(&req).is_err());
    }
}
