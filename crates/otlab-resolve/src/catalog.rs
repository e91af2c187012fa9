//! Demo service catalog
//!
//! The logical services every scenario deploys, their ports and what they
//! talk to. Upstream addresses are always derived through
//! [`derive_service_name`](crate::naming::derive_service_name), so wiring
//! follows the scenario prefix.

use crate::error::{CatalogError, NamingError};
use crate::metadata::DeploymentMetadata;
use crate::resolver::ResolvedConfig;
use otlab_core::keys::env;
use otlab_core::{validate_label_fragment, DnsLabel};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Something a service needs to reach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Dependency {
    /// Another catalog service, injected as `<env_var>=http://<name>:<port>`
    Service {
        /// Base name of the upstream service
        base: String,
        /// Variable carrying its URL
        env_var: String,
    },
    /// A TCP backing store, injected as `<PREFIX>_HOST` / `<PREFIX>_PORT`
    Backing {
        /// Base name of the store
        base: String,
        /// Port
        port: u16,
        /// Variable prefix, e.g. `REDIS`
        env_prefix: String,
    },
}

/// One logical service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Base name, prefixed per scenario
    pub base: String,
    /// Listening port
    pub port: u16,
    /// Upstreams
    #[serde(default)]
    pub depends_on: Vec<Dependency>,
}

impl ServiceSpec {
    /// Create a service without dependencies
    #[must_use]
    pub fn new(base: impl Into<String>, port: u16) -> Self {
        Self {
            base: base.into(),
            port,
            depends_on: Vec::new(),
        }
    }

    /// Depends on another catalog service
    #[must_use]
    pub fn calls(mut self, base: impl Into<String>, env_var: impl Into<String>) -> Self {
        self.depends_on.push(Dependency::Service {
            base: base.into(),
            env_var: env_var.into(),
        });
        self
    }

    /// Depends on a backing store
    #[must_use]
    pub fn backed_by(mut self, base: impl Into<String>, port: u16, env_prefix: impl Into<String>) -> Self {
        self.depends_on.push(Dependency::Backing {
            base: base.into(),
            port,
            env_prefix: env_prefix.into(),
        });
        self
    }
}

/// Container environment entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvVar {
    /// Variable name
    pub name: String,
    /// Value
    pub value: String,
}

impl EnvVar {
    fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Validated set of services
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCatalog {
    services: Vec<ServiceSpec>,
}

impl ServiceCatalog {
    /// Build and validate a catalog
    ///
    /// # Errors
    /// Invalid base names, duplicates, unknown service dependencies or
    /// dependency cycles.
    pub fn new(services: Vec<ServiceSpec>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for service in &services {
            validate_base(&service.base)?;
            if !seen.insert(service.base.as_str()) {
                return Err(CatalogError::DuplicateService(service.base.clone()));
            }
        }

        for service in &services {
            for dependency in &service.depends_on {
                match dependency {
                    Dependency::Service { base, .. } if !seen.contains(base.as_str()) => {
                        return Err(CatalogError::UnknownDependency {
                            service: service.base.clone(),
                            dependency: base.clone(),
                        });
                    }
                    Dependency::Backing { base, .. } => validate_base(base)?,
                    Dependency::Service { .. } => {}
                }
            }
        }

        let catalog = Self { services };
        catalog.deploy_order()?;
        Ok(catalog)
    }

    /// The lab's demo services
    #[must_use]
    pub fn demo() -> Self {
        Self {
            services: vec![
                ServiceSpec::new("frontend-service", 3000).calls("api-service", "API_SERVICE_URL"),
                ServiceSpec::new("api-service", 5001)
                    .calls("database-service", "DATABASE_SERVICE_URL"),
                ServiceSpec::new("database-service", 5002).backed_by("redis", 6379, "REDIS"),
            ],
        }
    }

    /// Services in declaration order
    #[inline]
    #[must_use]
    pub fn services(&self) -> &[ServiceSpec] {
        &self.services
    }

    /// Look up a service by base name
    #[must_use]
    pub fn get(&self, base: &str) -> Option<&ServiceSpec> {
        self.services.iter().find(|s| s.base == base)
    }

    /// Services with dependencies before dependents
    ///
    /// # Errors
    /// [`CatalogError::DependencyCycle`] if no such order exists.
    pub fn deploy_order(&self) -> Result<Vec<&ServiceSpec>, CatalogError> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for service in &self.services {
            graph.add_node(service.base.as_str());
        }
        for service in &self.services {
            for dependency in &service.depends_on {
                if let Dependency::Service { base, .. } = dependency {
                    graph.add_edge(base.as_str(), service.base.as_str(), ());
                }
            }
        }

        let order = toposort(&graph, None)
            .map_err(|cycle| CatalogError::DependencyCycle(cycle.node_id().to_string()))?;

        Ok(order.into_iter().filter_map(|base| self.get(base)).collect())
    }

    /// Container environment of `service` in a resolved scenario
    ///
    /// # Errors
    /// [`NamingError`] if a derived name is invalid.
    pub fn environment(
        &self,
        config: &ResolvedConfig,
        metadata: &DeploymentMetadata,
        service: &ServiceSpec,
    ) -> Result<Vec<EnvVar>, NamingError> {
        let name = config.service_name(&service.base)?;
        let namespace = config.namespace();

        let mut vars = vec![
            EnvVar::new(env::SCENARIO, &metadata.scenario),
            EnvVar::new(env::DEPLOYMENT_PATTERN, &metadata.deployment_pattern),
            EnvVar::new(env::OTEL_SERVICE_NAME, name.as_str()),
            EnvVar::new(env::OTEL_EXPORTER_OTLP_ENDPOINT, &metadata.telemetry_target),
            EnvVar::new(
                env::OTEL_RESOURCE_ATTRIBUTES,
                format!(
                    "deployment.environment={namespace},service.namespace={namespace},\
                     git.commit.sha={},git.repository_url={}",
                    metadata.git_commit_sha, metadata.git_repository_url
                ),
            ),
            EnvVar::new(env::DD_GIT_COMMIT_SHA, &metadata.git_commit_sha),
            EnvVar::new(env::DD_GIT_REPOSITORY_URL, &metadata.git_repository_url),
            EnvVar::new(env::PORT, service.port.to_string()),
        ];

        for dependency in &service.depends_on {
            match dependency {
                Dependency::Service { base, env_var } => {
                    let upstream = config.service_name(base)?;
                    let port = self.get(base).map_or(80, |s| s.port);
                    vars.push(EnvVar::new(env_var, format!("http://{upstream}:{port}")));
                }
                Dependency::Backing {
                    base,
                    port,
                    env_prefix,
                } => {
                    let host = config.service_name(base)?;
                    vars.push(EnvVar::new(format!("{env_prefix}_HOST"), host.as_str()));
                    vars.push(EnvVar::new(format!("{env_prefix}_PORT"), port.to_string()));
                }
            }
        }

        Ok(vars)
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::demo()
    }
}

fn validate_base(base: &str) -> Result<(), NamingError> {
    validate_label_fragment(base).map_err(|e| NamingError::InvalidBaseName {
        base: base.to_string(),
        reason: e.reason(),
    })?;
    // a base must also stand alone as a label
    DnsLabel::parse(base)
        .map(|_| ())
        .map_err(|e| NamingError::InvalidBaseName {
            base: base.to_string(),
            reason: e.reason(),
        })
}
