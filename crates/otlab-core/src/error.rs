//! Error types for OTLab core values
//!
//! Every variant is a deterministic function of its input, so none of them
//! is worth retrying.

/// Validation failures for core value types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Value is not a valid DNS-1035 label or label fragment
    #[error("invalid label '{value}': {reason}")]
    InvalidLabel {
        /// Offending value
        value: String,
        /// What rule it breaks
        reason: String,
    },

    /// Value is not a well-formed `http(s)://host[:port]` URL
    #[error("invalid endpoint '{value}': {reason}")]
    InvalidEndpoint {
        /// Offending value
        value: String,
        /// What rule it breaks
        reason: String,
    },

    /// Text does not name any scenario
    #[error("unknown scenario id: '{0}'")]
    UnknownScenarioId(String),
}

impl CoreError {
    /// Create label error
    pub fn invalid_label(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLabel {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create endpoint error
    pub fn invalid_endpoint(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Human readable reason, without the offending value
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidLabel { reason, .. } | Self::InvalidEndpoint { reason, .. } => {
                reason.clone()
            }
            Self::UnknownScenarioId(_) => "not a registered scenario".to_string(),
        }
    }

    /// Always `false`: validation is deterministic
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}
