//! Handle scoping requests to the `/checks` resource.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::Client;
use crate::error::ClientError;
use crate::http::HttpRequest;

const CHECKS_PATH: &str = "/checks";

/// Borrowed view of a `Client` that builds requests under `/checks`.
#[derive(Debug, Clone, Copy)]
pub struct Checks<'a> {
    client: &'a Client,
}

impl<'a> Checks<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn resource_path(&self) -> &'static str {
        CHECKS_PATH
    }

    /// `suffix` is empty, `/{id}`, `{id}` or a `?query`.
    pub fn path(&self, suffix: &str) -> String {
        if suffix.is_empty() || suffix.starts_with('/') || suffix.starts_with('?') {
            format!("{CHECKS_PATH}{suffix}")
        } else {
            format!("{CHECKS_PATH}/{suffix}")
        }
    }

    pub fn new_request(&self, method: &str, suffix: &str) -> Result<HttpRequest, ClientError> {
        self.client.new_request(method, &self.path(suffix))
    }

    pub fn new_request_with_body<B>(&self, method: &str, suffix: &str, body: &B) -> Result<HttpRequest, ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.client.new_request_with_body(method, &self.path(suffix), body)
    }

    pub fn send_json<T>(&self, request: &HttpRequest) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        self.client.send_json(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::BoxError;
    use crate::http::{HttpMethod, HttpResponse};

    fn client() -> Client {
        let transport = |req: &HttpRequest| -> Result<HttpResponse, BoxError> {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: format!(r#"{{"url":"{}"}}"#, req.url),
            })
        };
        let config = ClientConfig::with_token("key").base_url("http://localhost:3000");
        Client::with_env(config, transport, |_| None).unwrap()
    }

    #[test]
    fn suffixes_resolve_under_checks() {
        let client = client();
        let checks = client.checks();
        assert_eq!(checks.path(""), "/checks");
        assert_eq!(checks.path("/85975"), "/checks/85975");
        assert_eq!(checks.path("85975"), "/checks/85975");
        assert_eq!(checks.path("?tags=web"), "/checks?tags=web");
    }

    #[test]
    fn builds_scoped_requests() {
        let client = client();
        let req = client.checks().new_request("GET", "/85975").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url.as_str(), "http://localhost:3000/checks/85975");
        assert_eq!(req.header("authorization"), Some("Bearer key"));

        let req = client
            .checks()
            .new_request_with_body("PUT", "85975", &serde_json::json!({"paused": true}))
            .unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"paused":true}"#));
    }

    #[test]
    fn send_json_goes_through_client() {
        let client = client();
        let checks = client.checks();
        let req = checks.new_request("GET", "").unwrap();
        let echoed: serde_json::Value = checks.send_json(&req).unwrap();
        assert_eq!(echoed["url"], "http://localhost:3000/checks");
    }
}
