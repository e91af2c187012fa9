//! Deploy plans
//!
//! A [`DeployPlan`] lists what a driver has to do to bring one scenario up:
//! check prerequisites, ensure the namespace, upgrade-or-install each
//! service in dependency order, then wait for readiness. Every step is
//! idempotent, so a plan can be re-run after a partial failure. Plans are
//! values; nothing here touches a cluster.

use crate::catalog::ServiceCatalog;
use crate::error::CatalogError;
use crate::helm::HelmValues;
use crate::metadata::DeploymentMetadata;
use crate::resolver::ResolvedConfig;
use otlab_core::{ComponentId, DnsLabel, ScenarioId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Knobs for plan generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOptions {
    /// Directory holding one chart per service base name
    pub charts_dir: String,
    /// Readiness wait per release
    pub readiness_timeout_secs: u64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            charts_dir: "./charts".to_string(),
            readiness_timeout_secs: 300,
        }
    }
}

/// A single driver action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "kebab-case")]
pub enum DeployStep {
    /// Prerequisite component must be running
    CheckComponent {
        /// Component
        component: ComponentId,
        /// How long to wait
        timeout_secs: u64,
    },
    /// Namespace must exist
    EnsureNamespace {
        /// Namespace
        namespace: DnsLabel,
    },
    /// `helm upgrade --install`
    UpgradeInstall {
        /// Release name (the derived service name)
        release: DnsLabel,
        /// Chart path
        chart: String,
        /// Target namespace
        namespace: DnsLabel,
        /// Release values
        values: HelmValues,
    },
    /// Rollout must complete
    AwaitReady {
        /// Release name
        release: DnsLabel,
        /// Namespace
        namespace: DnsLabel,
        /// How long to wait
        timeout_secs: u64,
    },
}

impl DeployStep {
    /// Shell command a driver would run for this step
    #[must_use]
    pub fn command(&self) -> String {
        match self {
            Self::CheckComponent {
                component,
                timeout_secs,
            } => format!(
                "kubectl wait --for=condition=Ready pods --all-namespaces \
                 -l app.kubernetes.io/name={component} --timeout={timeout_secs}s"
            ),
            Self::EnsureNamespace { namespace } => format!(
                "kubectl create namespace {namespace} --dry-run=client -o yaml | kubectl apply -f -"
            ),
            Self::UpgradeInstall {
                release,
                chart,
                namespace,
                values,
            } => {
                let mut parts = vec![
                    "helm".to_string(),
                    "upgrade".to_string(),
                    "--install".to_string(),
                    release.to_string(),
                    shell_quote(chart),
                    "--namespace".to_string(),
                    namespace.to_string(),
                ];
                parts.extend(values.to_set_args().iter().map(|arg| shell_quote(arg)));
                parts.join(" ")
            }
            Self::AwaitReady {
                release,
                namespace,
                timeout_secs,
            } => format!(
                "kubectl rollout status deployment/{release} -n {namespace} --timeout={timeout_secs}s"
            ),
        }
    }
}

impl Display for DeployStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command())
    }
}

/// Ordered driver actions for one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployPlan {
    scenario: ScenarioId,
    steps: Vec<DeployStep>,
}

impl DeployPlan {
    /// Build the plan for a resolved scenario
    ///
    /// # Errors
    /// [`CatalogError`] if the catalog cannot be ordered or a name cannot be
    /// derived.
    pub fn for_scenario(
        config: &ResolvedConfig,
        metadata: &DeploymentMetadata,
        catalog: &ServiceCatalog,
        options: &PlanOptions,
    ) -> Result<Self, CatalogError> {
        let namespace = config.namespace().clone();
        let mut steps: Vec<DeployStep> = config
            .required_components()
            .iter()
            .map(|component| DeployStep::CheckComponent {
                component: component.clone(),
                timeout_secs: options.readiness_timeout_secs,
            })
            .collect();

        steps.push(DeployStep::EnsureNamespace {
            namespace: namespace.clone(),
        });

        let order = catalog.deploy_order()?;
        let mut releases = Vec::with_capacity(order.len());
        for service in order {
            let release = config.service_name(&service.base)?;
            steps.push(DeployStep::UpgradeInstall {
                release: release.clone(),
                chart: format!("{}/{}", options.charts_dir.trim_end_matches('/'), service.base),
                namespace: namespace.clone(),
                values: HelmValues::for_service(config, metadata, catalog, service)?,
            });
            releases.push(release);
        }

        steps.extend(releases.into_iter().map(|release| DeployStep::AwaitReady {
            release,
            namespace: namespace.clone(),
            timeout_secs: options.readiness_timeout_secs,
        }));

        tracing::debug!(scenario = %config.scenario(), steps = steps.len(), "deploy plan built");
        Ok(Self {
            scenario: config.scenario(),
            steps,
        })
    }

    /// Scenario this plan deploys
    #[inline]
    #[must_use]
    pub fn scenario(&self) -> ScenarioId {
        self.scenario
    }

    /// Steps in execution order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[DeployStep] {
        &self.steps
    }

    /// Shell commands in execution order
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.steps.iter().map(DeployStep::command).collect()
    }
}

/// Quote for POSIX shells unless the text is plainly safe
#[must_use]
pub fn shell_quote(text: &str) -> String {
    let safe = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=@%+,".contains(c));
    if safe {
        text.to_string()
    } else {
        format!("'{}'", text.replace('\'', r"'\''"))
    }
}
