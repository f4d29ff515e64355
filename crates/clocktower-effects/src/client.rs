//! Bearer-authenticated JSON client bound to a base URL.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{EffectError, Result};

/// Parse a base URL, making sure relative paths join below it.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    Ok(Url::parse(&base)?)
}

/// Interpret a response body. Empty bodies become `null`, and non-JSON
/// bodies are kept as a string.
pub(crate) fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Blocking REST client used by the synchronous effect adapters.
#[derive(Debug, Clone)]
pub struct RestClient {
    base: Url,
    token: String,
    client: reqwest::blocking::Client,
}

impl RestClient {
    /// Create a client for `base_url` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns `EffectError::InvalidUrl` for a malformed base URL or
    /// `EffectError::Request` if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, None)
    }

    /// Same as [`RestClient::new`] with a per-request timeout.
    ///
    /// # Errors
    ///
    /// See [`RestClient::new`].
    pub fn with_timeout(
        base_url: &str,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base: parse_base_url(base_url)?,
            token: token.into(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a path relative to the base URL.
    ///
    /// # Errors
    ///
    /// Returns `EffectError::InvalidUrl` if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// POST a JSON body to `path` and return the decoded response.
    ///
    /// # Errors
    ///
    /// Returns `EffectError::Status` for non-2xx responses and
    /// `EffectError::Request` for transport failures.
    pub fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(url.clone())
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(EffectError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(parse_body(&response.text()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_below_base() {
        let client = RestClient::new("https://api.example.com/v1", "t").unwrap();
        assert_eq!(
            client.endpoint("devices/abc/commands").unwrap().as_str(),
            "https://api.example.com/v1/devices/abc/commands"
        );
        assert_eq!(
            client.endpoint("/api/services/x").unwrap().as_str(),
            "https://api.example.com/v1/api/services/x"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = RestClient::new("not a url", "t").unwrap_err();
        assert!(matches!(err, EffectError::InvalidUrl(_)));
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("{\"ok\":true}")["ok"], true);
        assert_eq!(parse_body("plain"), Value::String("plain".into()));
    }
}
