//! Lab configuration file (`otlab.yaml`)
//!
//! Precedence, per field:
//!
//! ```text
//! ^ Highest
//! * command-line flag
//! * otlab.yaml
//! * built-in default
//! v Lowest
//! ```

use otlab_resolve::{Overrides, PlanOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "otlab.yaml";

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Path
        path: PathBuf,
        /// Cause
        #[source]
        source: std::io::Error,
    },

    /// File is not a valid config document
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Path, or `<inline>`
        path: PathBuf,
        /// Cause
        #[source]
        source: serde_yaml::Error,
    },
}

/// Lab-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    /// YAML registry replacing the built-in scenario table
    pub registry_file: Option<PathBuf>,
    /// Working tree inspected for revision info
    pub repository_root: Option<PathBuf>,
    /// Directory holding one chart per service
    pub charts_dir: String,
    /// Readiness wait per release
    pub readiness_timeout_secs: u64,
    /// Overrides applied when no flag sets the field
    pub default_overrides: Overrides,
}

impl Default for LabConfig {
    fn default() -> Self {
        let plan = PlanOptions::default();
        Self {
            registry_file: None,
            repository_root: None,
            charts_dir: plan.charts_dir,
            readiness_timeout_secs: plan.readiness_timeout_secs,
            default_overrides: Overrides::none(),
        }
    }
}

impl LabConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With registry file
    #[inline]
    #[must_use]
    pub fn with_registry_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry_file = Some(path.into());
        self
    }

    /// With repository root
    #[inline]
    #[must_use]
    pub fn with_repository_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.repository_root = Some(path.into());
        self
    }

    /// With charts directory
    #[inline]
    #[must_use]
    pub fn with_charts_dir(mut self, dir: impl Into<String>) -> Self {
        self.charts_dir = dir.into();
        self
    }

    /// With readiness timeout
    #[inline]
    #[must_use]
    pub fn with_readiness_timeout(mut self, secs: u64) -> Self {
        self.readiness_timeout_secs = secs;
        self
    }

    /// With default overrides
    #[inline]
    #[must_use]
    pub fn with_default_overrides(mut self, overrides: Overrides) -> Self {
        self.default_overrides = overrides;
        self
    }

    /// Parse YAML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed YAML or unknown keys.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Read a config file
    ///
    /// Relative `registry_file` and `repository_root` paths are taken
    /// relative to the file's directory.
    ///
    /// # Errors
    /// [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.registry_file = config.registry_file.map(|p| base.join(p));
            config.repository_root = config.repository_root.map(|p| base.join(p));
        }

        tracing::debug!(path = %path.display(), "lab config loaded");
        Ok(config)
    }

    /// Load `otlab.yaml` from `dir` if present, defaults otherwise
    ///
    /// # Errors
    /// As [`LabConfig::from_file`] when the file exists.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let candidate = dir.as_ref().join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::from_file(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Plan options derived from this config
    #[must_use]
    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            charts_dir: self.charts_dir.clone(),
            readiness_timeout_secs: self.readiness_timeout_secs,
        }
    }

    /// Flag overrides on top of the configured defaults
    #[must_use]
    pub fn effective_overrides(&self, flags: Overrides) -> Overrides {
        flags.or(self.default_overrides.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plan_defaults() {
        let config = LabConfig::default();
        assert_eq!(config.charts_dir, "./charts");
        assert_eq!(config.readiness_timeout_secs, 300);
        assert!(config.default_overrides.is_empty());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = LabConfig::from_yaml_str("readiness_timeout_secs: 60\n").unwrap();
        assert_eq!(config.readiness_timeout_secs, 60);
        assert_eq!(config.charts_dir, "./charts");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = LabConfig::from_yaml_str("chart: ./charts/demo\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn flags_win_over_configured_overrides() {
        let config = LabConfig::new().with_default_overrides(
            Overrides::none()
                .with_endpoint("http://collector.lab:4318")
                .with_namespace("lab"),
        );
        let effective = config.effective_overrides(Overrides::none().with_namespace("mine"));
        assert_eq!(effective.namespace.as_deref(), Some("mine"));
        assert_eq!(effective.endpoint.as_deref(), Some("http://collector.lab:4318"));
        assert_eq!(effective.service_prefix, None);
    }
}
