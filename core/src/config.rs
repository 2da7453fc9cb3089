//! Client configuration and credential resolution.

use serde::Deserialize;
use url::Url;

use crate::error::ClientError;

/// Root endpoint of the Pingdom API.
pub const DEFAULT_BASE_URL: &str = "https://api.pingdom.com/api/3.1";

/// Environment variable consulted when no token is configured.
pub const API_TOKEN_ENV: &str = "PINGDOM_API_TOKEN";

/// Settings for `Client`. Every field is optional; empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_token: Option<String>,
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            api_token: Some(token.into()),
            base_url: None,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// An explicit token always wins; the environment is only asked when the
/// configured token is missing or empty.
pub(crate) fn resolve_token<F>(configured: Option<&str>, lookup: F) -> Result<String, ClientError>
where
    F: FnOnce(&str) -> Option<String>,
{
    if let Some(token) = configured.filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }
    lookup(API_TOKEN_ENV)
        .filter(|t| !t.is_empty())
        .ok_or(ClientError::MissingCredential)
}

pub(crate) fn parse_base_url(raw: Option<&str>) -> Result<Url, ClientError> {
    let raw = raw.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_BASE_URL);
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidConfig(format!("base URL `{raw}`: {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidConfig(format!(
            "base URL `{raw}` must be an absolute http(s) URL"
        )));
    }
    Ok(url)
}
