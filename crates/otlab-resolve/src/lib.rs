//! OTLab Resolve
//!
//! Turns a scenario identifier into everything a deployment driver needs:
//! - **Resolver**: descriptor defaults + per-field overrides + revision info
//! - **derive_service_name**: the one place prefixes meet base names
//! - **project**: the fixed metadata key set for every workload
//! - **ServiceCatalog**, **HelmValues**, **DeployPlan**: driver-facing views
//!
//! # Example
//!
//! ```rust
//! use otlab_core::{ScenarioId, SourceRevisionInfo};
//! use otlab_registry::ScenarioRegistry;
//! use otlab_resolve::{derive_service_name, project, Overrides, Resolver};
//!
//! let resolver = Resolver::new(ScenarioRegistry::builtin());
//! let config = resolver
//!     .resolve(ScenarioId::Scenario1, &Overrides::none(), SourceRevisionInfo::unknown())
//!     .unwrap();
//!
//! let name = derive_service_name(&config, "api-service").unwrap();
//! assert_eq!(name.as_str(), "datadog-api-service");
//!
//! let metadata = project(&config);
//! assert_eq!(metadata.git_commit_sha, "unknown");
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod helm;
pub mod metadata;
pub mod naming;
pub mod plan;
pub mod resolver;

// Re-exports
pub use catalog::{Dependency, EnvVar, ServiceCatalog, ServiceSpec};
pub use error::{CatalogError, NamingError, OverrideField, ResolveError};
pub use helm::HelmValues;
pub use metadata::{project, DeploymentMetadata};
pub use naming::{derive_service_name, join_service_name};
pub use plan::{shell_quote, DeployPlan, DeployStep, PlanOptions};
pub use resolver::{Overrides, ResolvedConfig, Resolver};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for drivers
    pub use crate::{
        derive_service_name, project, DeployPlan, DeploymentMetadata, HelmValues, Overrides,
        PlanOptions, ResolveError, ResolvedConfig, Resolver, ServiceCatalog,
    };
}
