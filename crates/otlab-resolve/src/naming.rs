//! Service name derivation
//!
//! The only place a scenario prefix is joined to a base service name.

use crate::error::NamingError;
use crate::resolver::ResolvedConfig;
use otlab_core::{validate_label_fragment, DnsLabel, MAX_LABEL_LEN};

/// Derive `<prefix>-<base>` for a resolved scenario
///
/// # Errors
/// - [`NamingError::InvalidBaseName`] if `base` is not a valid label fragment
/// - [`NamingError::NameTooLong`] if the result exceeds 63 characters
pub fn derive_service_name(config: &ResolvedConfig, base: &str) -> Result<DnsLabel, NamingError> {
    join_service_name(config.service_prefix(), base)
}

/// Join a validated prefix and a base name
///
/// # Errors
/// As [`derive_service_name`].
pub fn join_service_name(prefix: &DnsLabel, base: &str) -> Result<DnsLabel, NamingError> {
    validate_label_fragment(base).map_err(|e| NamingError::InvalidBaseName {
        base: base.to_string(),
        reason: e.reason(),
    })?;

    let name = format!("{prefix}-{base}");
    if name.len() > MAX_LABEL_LEN {
        let len = name.len();
        return Err(NamingError::NameTooLong { name, len });
    }

    // prefix starts with a letter and base is a valid fragment
    DnsLabel::parse(name.as_str()).map_err(|e| NamingError::InvalidBaseName {
        base: base.to_string(),
        reason: e.reason(),
    })
}

impl ResolvedConfig {
    /// Derive a service name in this scenario
    ///
    /// # Errors
    /// As [`derive_service_name`].
    #[inline]
    pub fn service_name(&self, base: &str) -> Result<DnsLabel, NamingError> {
        derive_service_name(self, base)
    }
}
