//! Well-known metadata keys and environment variable names
//!
//! The metadata keys form the wire format attached to every deployed
//! workload. Each scenario emits all of them, in this order.

/// Scenario identifier, e.g. `scenario1`.
pub const SCENARIO_KEY: &str = "scenario";

/// Deployment pattern, e.g. `via-collector`.
pub const DEPLOYMENT_PATTERN_KEY: &str = "deployment-pattern";

/// Telemetry endpoint the workload exports to.
pub const TELEMETRY_TARGET_KEY: &str = "telemetry-target";

/// Commit the workload was built from.
pub const GIT_COMMIT_SHA_KEY: &str = "git-commit-sha";

/// Repository locator, scheme stripped.
pub const GIT_REPOSITORY_URL_KEY: &str = "git-repository-url";

/// The complete, ordered metadata key set.
pub const METADATA_KEYS: [&str; 5] = [
    SCENARIO_KEY,
    DEPLOYMENT_PATTERN_KEY,
    TELEMETRY_TARGET_KEY,
    GIT_COMMIT_SHA_KEY,
    GIT_REPOSITORY_URL_KEY,
];

/// Sentinel for revision fields that could not be determined.
pub const UNKNOWN: &str = "unknown";

/// Environment variable names injected into demo service containers.
pub mod env {
    /// Scenario identifier
    pub const SCENARIO: &str = "SCENARIO";
    /// Deployment pattern
    pub const DEPLOYMENT_PATTERN: &str = "DEPLOYMENT_PATTERN";
    /// OpenTelemetry service name
    pub const OTEL_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";
    /// OTLP exporter endpoint
    pub const OTEL_EXPORTER_OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
    /// OpenTelemetry resource attributes
    pub const OTEL_RESOURCE_ATTRIBUTES: &str = "OTEL_RESOURCE_ATTRIBUTES";
    /// Commit for source code integration
    pub const DD_GIT_COMMIT_SHA: &str = "DD_GIT_COMMIT_SHA";
    /// Repository for source code integration
    pub const DD_GIT_REPOSITORY_URL: &str = "DD_GIT_REPOSITORY_URL";
    /// Listening port
    pub const PORT: &str = "PORT";
}
