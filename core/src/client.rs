//! Pingdom API client: request building and execution.
//!
//! # Design
//! `Client` holds the resolved token, the base URL and a shared transport,
//! and is never mutated after construction, so it can be cloned and used
//! from several threads without locking. Building a request (`new_request*`)
//! is pure; `send` runs it through the transport and the status validator;
//! `send_json` additionally decodes the body into the caller's type, and
//! `send_json_with_response` hands back the response alongside it.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::checks::Checks;
use crate::config::{parse_base_url, resolve_token, ClientConfig};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE};
use crate::transport::{Transport, UreqTransport};
use crate::validate::validate_response;

/// Synchronous client for the Pingdom REST API.
#[derive(Clone)]
pub struct Client {
    api_token: String,
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Client over the default `ureq` transport, reading `PINGDOM_API_TOKEN`
    /// from the process environment if `config` carries no token.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_transport(config, UreqTransport::new())
    }

    pub fn with_transport<T>(config: ClientConfig, transport: T) -> Result<Self, ClientError>
    where
        T: Transport + 'static,
    {
        Self::with_env(config, transport, |name| std::env::var(name).ok())
    }

    /// Like `with_transport`, with the environment lookup supplied by the caller.
    pub fn with_env<T, F>(config: ClientConfig, transport: T, lookup: F) -> Result<Self, ClientError>
    where
        T: Transport + 'static,
        F: FnOnce(&str) -> Option<String>,
    {
        let api_token = resolve_token(config.api_token.as_deref(), lookup)?;
        let base_url = parse_base_url(config.base_url.as_deref())?;
        Ok(Self {
            api_token,
            base_url,
            transport: Arc::new(transport),
        })
    }

    /// A copy of this client that sends to `base_url` instead.
    pub fn with_base_url(&self, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_base_url(Some(base_url))?,
            ..self.clone()
        })
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn checks(&self) -> Checks<'_> {
        Checks::new(self)
    }

    /// Build a request without a body.
    ///
    /// `path` is appended to the base URL's path; a `?query` in `path` is
    /// appended after any query the base URL already has.
    pub fn new_request(&self, method: &str, path: &str) -> Result<HttpRequest, ClientError> {
        let method: HttpMethod = method.parse()?;
        let url = self.resolve(path)?;
        Ok(HttpRequest {
            method,
            url,
            headers: vec![(AUTHORIZATION.to_string(), format!("Bearer {}", self.api_token))],
            body: None,
        })
    }

    /// Build a request whose body is `body` serialized as JSON.
    pub fn new_request_with_body<B>(&self, method: &str, path: &str, body: &B) -> Result<HttpRequest, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.new_request(method, path)?;
        let body = serde_json::to_string(body).map_err(ClientError::EncodingError)?;
        request.headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        request.body = Some(body);
        Ok(request)
    }

    /// Execute `request` and return the response if its status is 2xx.
    ///
    /// Transport failures are returned as `TransportError` holding the
    /// transport's own error; nothing is retried.
    #[tracing::instrument(skip_all, fields(method = %request.method, url = %request.url))]
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        tracing::debug!("sending request");
        let response = self.transport.execute(request).map_err(ClientError::TransportError)?;
        tracing::debug!(status = response.status, "received response");
        validate_response(&response)?;
        Ok(response)
    }

    /// Execute `request` and decode the JSON body into `T`.
    pub fn send_json<T>(&self, request: &HttpRequest) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        self.send_json_with_response(request).map(|(_, value)| value)
    }

    /// Like `send_json`, also returning the validated response so callers
    /// can read its status and headers (e.g. `req-limit-short`).
    pub fn send_json_with_response<T>(&self, request: &HttpRequest) -> Result<(HttpResponse, T), ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(request)?;
        let value = serde_json::from_str(&response.body).map_err(ClientError::DecodingError)?;
        Ok((response, value))
    }

    fn resolve(&self, path: &str) -> Result<Url, ClientError> {
        if path.contains('#') {
            return Err(ClientError::InvalidRequest(format!("path `{path}` must not carry a fragment")));
        }
        let (rel_path, query) = match path.split_once('?') {
            Some((rel_path, query)) => (rel_path, Some(query)),
            None => (path, None),
        };
        if rel_path.contains("://") || Url::parse(rel_path).is_ok() {
            return Err(ClientError::InvalidRequest(format!("path `{path}` must be relative to the base URL")));
        }
        // `set_path` collapses dot segments, which would escape the base path.
        if rel_path.split('/').any(is_dot_segment) {
            return Err(ClientError::InvalidRequest(format!("path `{path}` must not contain dot segments")));
        }

        let mut url = self.base_url.clone();
        if !rel_path.is_empty() {
            let joined = format!(
                "{}/{}",
                url.path().trim_end_matches('/'),
                rel_path.trim_start_matches('/')
            );
            url.set_path(&joined);
        }
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            let merged = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
                _ => query.to_string(),
            };
            url.set_query(Some(&merged));
        }
        Ok(url)
    }
}

/// `.` and `..`, including their percent-encoded forms, which `url` also collapses.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
