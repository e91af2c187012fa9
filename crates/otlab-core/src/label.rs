//! DNS-1035 labels and Kubernetes label values
//!
//! Provides [`DnsLabel`] for names that end up as Kubernetes object names
//! (namespaces, services, Helm releases) and helpers for label fragments and
//! label values.

use crate::error::CoreError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Maximum length of a DNS-1035 label and of a Kubernetes label value
pub const MAX_LABEL_LEN: usize = 63;

static LABEL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("static regex is valid"));

static LABEL_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9])?$").expect("static regex is valid")
});

/// Validated DNS-1035 label
///
/// At most 63 characters, lowercase alphanumerics and `-`, starting with a
/// letter and ending with an alphanumeric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DnsLabel(String);

impl DnsLabel {
    /// Parse and validate a label
    ///
    /// Input is never lowercased or truncated; anything outside the rules is
    /// rejected.
    pub fn parse(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        if value.len() > MAX_LABEL_LEN {
            return Err(CoreError::invalid_label(
                &value,
                format!("longer than {MAX_LABEL_LEN} characters ({})", value.len()),
            ));
        }
        validate_label_fragment(&value)?;
        if !value.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(CoreError::invalid_label(&value, "must start with a lowercase letter"));
        }
        Ok(Self(value))
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes (labels are ASCII)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Labels are never empty; provided for clippy symmetry with `len`
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the owned string
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for DnsLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DnsLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DnsLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DnsLabel {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DnsLabel> for String {
    fn from(label: DnsLabel) -> Self {
        label.0
    }
}

/// Check that `value` can appear inside a label
///
/// A fragment is non-empty, uses only `[a-z0-9-]` and neither starts nor
/// ends with `-`. Unlike a full label it may start with a digit.
pub fn validate_label_fragment(value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::invalid_label(value, "empty"));
    }
    if value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(CoreError::invalid_label(value, "contains uppercase letters"));
    }
    if !LABEL_CHARS.is_match(value) {
        return Err(CoreError::invalid_label(
            value,
            "only lowercase alphanumerics and '-' are allowed",
        ));
    }
    if value.starts_with('-') || value.ends_with('-') {
        return Err(CoreError::invalid_label(value, "must not start or end with '-'"));
    }
    Ok(())
}

/// Turn an arbitrary string into a valid Kubernetes label value
///
/// Disallowed characters become `_`, the result is cut to 63 characters and
/// non-alphanumeric edges are trimmed. Values that are already valid are
/// returned unchanged.
#[must_use]
pub fn sanitize_label_value(value: &str) -> String {
    if value.len() <= MAX_LABEL_LEN && LABEL_VALUE.is_match(value) {
        return value.to_string();
    }

    let replaced: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_LABEL_LEN)
        .collect();

    replaced
        .trim_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_accepts_typical_names() {
        for name in ["datadog-scenario1", "otel", "a", "ddot-frontend-service"] {
            assert!(DnsLabel::parse(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn label_rejects_uppercase() {
        let err = DnsLabel::parse("Api-Service").unwrap_err();
        assert!(err.to_string().contains("uppercase"));
    }

    #[test]
    fn label_rejects_leading_digit() {
        assert!(DnsLabel::parse("1api").is_err());
    }

    #[test]
    fn label_rejects_edges_and_symbols() {
        assert!(DnsLabel::parse("-api").is_err());
        assert!(DnsLabel::parse("api-").is_err());
        assert!(DnsLabel::parse("api_service").is_err());
        assert!(DnsLabel::parse("api.service").is_err());
        assert!(DnsLabel::parse("").is_err());
    }

    #[test]
    fn label_rejects_64_chars() {
        let long = "a".repeat(64);
        let err = DnsLabel::parse(long).unwrap_err();
        assert!(err.to_string().contains("longer than 63"));
        assert!(DnsLabel::parse("a".repeat(63)).is_ok());
    }

    #[test]
    fn fragment_may_start_with_digit() {
        assert!(validate_label_fragment("5xx-handler").is_ok());
        assert!(validate_label_fragment("api-").is_err());
    }

    #[test]
    fn sanitize_keeps_valid_values() {
        assert_eq!(sanitize_label_value("via-collector"), "via-collector");
        assert_eq!(sanitize_label_value("unknown"), "unknown");
        assert_eq!(sanitize_label_value(""), "");
    }

    #[test]
    fn sanitize_replaces_url_characters() {
        let value = sanitize_label_value("github.com/acme/otel-lab");
        assert_eq!(value, "github.com_acme_otel-lab");
    }

    #[test]
    fn sanitize_trims_edges_and_length() {
        let value = sanitize_label_value("http://datadog-agent:4318");
        assert_eq!(value, "http___datadog-agent_4318");

        let long = format!("{}/", "x".repeat(80));
        let value = sanitize_label_value(&long);
        assert_eq!(value.len(), MAX_LABEL_LEN);
    }

    #[test]
    fn serde_rejects_invalid_label() {
        let parsed: Result<DnsLabel, _> = serde_json::from_str("\"Bad_Name\"");
        assert!(parsed.is_err());
        let parsed: DnsLabel = serde_json::from_str("\"good-name\"").unwrap();
        assert_eq!(parsed.as_str(), "good-name");
    }
}
