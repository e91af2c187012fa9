//! Telemetry endpoints
//!
//! An [`Endpoint`] is the upstream OTLP destination a demo service exports
//! to. Only `scheme://host[:port]` is accepted; the original text is kept
//! verbatim so overrides come back out exactly as they went in.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use url::Url;

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Validated telemetry endpoint URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint {
    raw: String,
    host: String,
    port: u16,
}

impl Endpoint {
    /// Parse and validate an endpoint
    ///
    /// # Errors
    /// [`CoreError::InvalidEndpoint`] when the scheme is missing or not
    /// `http`/`https`, the host is missing, the URL carries a path, query,
    /// fragment or credentials, or the text contains whitespace, control
    /// characters or anything the URL parser would rewrite.
    pub fn parse(value: impl Into<String>) -> Result<Self, CoreError> {
        let raw = value.into();

        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(CoreError::invalid_endpoint(
                &raw,
                "whitespace and control characters are not allowed",
            ));
        }
        if !raw.contains("://") {
            return Err(CoreError::invalid_endpoint(&raw, "missing scheme (expected http:// or https://)"));
        }

        let parsed =
            Url::parse(&raw).map_err(|e| CoreError::invalid_endpoint(&raw, e.to_string()))?;

        if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return Err(CoreError::invalid_endpoint(
                &raw,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CoreError::invalid_endpoint(&raw, "missing host"))?
            .to_string();

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(CoreError::invalid_endpoint(&raw, "credentials are not allowed"));
        }
        if parsed.path() != "/" && !parsed.path().is_empty() {
            return Err(CoreError::invalid_endpoint(
                &raw,
                format!("unexpected path '{}'", parsed.path()),
            ));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(CoreError::invalid_endpoint(&raw, "query and fragment are not allowed"));
        }

        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| CoreError::invalid_endpoint(&raw, "missing port"))?;

        // host() and port() must describe exactly the text handed out by as_str()
        let bare = format!("{}://{host}", parsed.scheme());
        let with_port = format!("{bare}:{port}");
        let body = raw.strip_suffix('/').unwrap_or(&raw);
        if body != bare && body != with_port {
            return Err(CoreError::invalid_endpoint(
                &raw,
                format!("not in canonical form (expected '{with_port}')"),
            ));
        }

        Ok(Self { raw, host, port })
    }

    /// Endpoint exactly as supplied
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Host component
    #[inline]
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, or the scheme default
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Endpoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.raw
    }
}
