//! Label/annotation projection
//!
//! [`project`] turns a [`ResolvedConfig`] into the fixed metadata key set
//! attached to every workload. Every scenario produces the same keys; only
//! the values differ. A missing revision field yields the literal
//! `"unknown"` instead of dropping the key.

use crate::resolver::ResolvedConfig;
use indexmap::IndexMap;
use otlab_core::keys::{
    DEPLOYMENT_PATTERN_KEY, GIT_COMMIT_SHA_KEY, GIT_REPOSITORY_URL_KEY, METADATA_KEYS,
    SCENARIO_KEY, TELEMETRY_TARGET_KEY,
};
use otlab_core::sanitize_label_value;
use serde::{Deserialize, Serialize};

/// Metadata attached to a deployed workload
///
/// Serializes with the wire keys `scenario`, `deployment-pattern`,
/// `telemetry-target`, `git-commit-sha`, `git-repository-url`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeploymentMetadata {
    /// Scenario identifier
    pub scenario: String,
    /// Deployment pattern
    pub deployment_pattern: String,
    /// Telemetry endpoint
    pub telemetry_target: String,
    /// Commit hash or `unknown`
    pub git_commit_sha: String,
    /// Repository locator or `unknown`
    pub git_repository_url: String,
}

/// Project a resolved configuration onto workload metadata
///
/// No side effects; applying the result to a cluster is the driver's job.
#[must_use]
pub fn project(config: &ResolvedConfig) -> DeploymentMetadata {
    let revision = config.revision();
    let metadata = DeploymentMetadata {
        scenario: config.scenario().as_str().to_string(),
        deployment_pattern: config.pattern().as_str().to_string(),
        telemetry_target: config.telemetry_endpoint().as_str().to_string(),
        git_commit_sha: revision.commit_sha.as_str().to_string(),
        git_repository_url: revision.repository_url.as_str().to_string(),
    };

    tracing::debug!(scenario = %metadata.scenario, "deployment metadata projected");
    metadata
}

impl DeploymentMetadata {
    /// Value for a wire key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            SCENARIO_KEY => Some(&self.scenario),
            DEPLOYMENT_PATTERN_KEY => Some(&self.deployment_pattern),
            TELEMETRY_TARGET_KEY => Some(&self.telemetry_target),
            GIT_COMMIT_SHA_KEY => Some(&self.git_commit_sha),
            GIT_REPOSITORY_URL_KEY => Some(&self.git_repository_url),
            _ => None,
        }
    }

    /// All `(key, value)` pairs in wire order
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        METADATA_KEYS
            .into_iter()
            .map(move |key| (key, self.get(key).unwrap_or_default()))
    }

    /// Annotations: raw values
    #[must_use]
    pub fn annotations(&self) -> IndexMap<&'static str, String> {
        self.entries()
            .map(|(key, value)| (key, value.to_string()))
            .collect()
    }

    /// Labels: values made safe for Kubernetes label rules
    #[must_use]
    pub fn labels(&self) -> IndexMap<&'static str, String> {
        self.entries()
            .map(|(key, value)| (key, sanitize_label_value(value)))
            .collect()
    }
}
