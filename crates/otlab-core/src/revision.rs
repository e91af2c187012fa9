//! Source revision information
//!
//! Captured once per deploy invocation and passed by value into resolution.
//! A field that could not be determined is [`RevisionField::Unknown`], which
//! is a normal value and serializes as the literal `"unknown"`.

use crate::keys::UNKNOWN;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A revision field that is either known or explicitly unknown
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RevisionField {
    /// Value was determined
    Known(String),
    /// Value could not be determined
    #[default]
    Unknown,
}

impl RevisionField {
    /// Build from an optional value; empty or blank text counts as unknown
    #[must_use]
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Self::Known(v.trim().to_string()),
            _ => Self::Unknown,
        }
    }

    /// Value, or `"unknown"`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(v) => v,
            Self::Unknown => UNKNOWN,
        }
    }

    /// Check if known
    #[inline]
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Keep `self` when known, otherwise take `other`
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        if self.is_known() {
            self
        } else {
            other
        }
    }
}

impl Display for RevisionField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RevisionField {
    fn from(value: String) -> Self {
        if value == UNKNOWN {
            Self::Unknown
        } else {
            Self::from_option(Some(value))
        }
    }
}

impl From<Option<String>> for RevisionField {
    fn from(value: Option<String>) -> Self {
        Self::from_option(value)
    }
}

impl From<RevisionField> for String {
    fn from(field: RevisionField) -> Self {
        match field {
            RevisionField::Known(v) => v,
            RevisionField::Unknown => UNKNOWN.to_string(),
        }
    }
}

/// Commit hash and repository locator of the deployed source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceRevisionInfo {
    /// Commit hash
    pub commit_sha: RevisionField,
    /// Repository locator, protocol scheme stripped
    pub repository_url: RevisionField,
}

impl SourceRevisionInfo {
    /// Create from known values
    #[must_use]
    pub fn new(commit_sha: impl Into<String>, repository_url: impl Into<String>) -> Self {
        Self {
            commit_sha: RevisionField::from_option(Some(commit_sha.into())),
            repository_url: RevisionField::from_option(Some(repository_url.into())),
        }
    }

    /// Both fields unknown
    #[inline]
    #[must_use]
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Check if every field is known
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.commit_sha.is_known() && self.repository_url.is_known()
    }

    /// Fill unknown fields from `fallback`, field by field
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            commit_sha: self.commit_sha.or(fallback.commit_sha),
            repository_url: self.repository_url.or(fallback.repository_url),
        }
    }
}
