//! OTLab Core
//!
//! Value types shared by every OTLab crate.
//!
//! # Overview
//!
//! - **ScenarioId**: closed set of deployment topologies
//! - **ScenarioDescriptor**: namespace, service prefix, endpoint and prerequisites of a scenario
//! - **DnsLabel** / **Endpoint**: validated naming and addressing primitives
//! - **SourceRevisionInfo**: commit + repository locator, with an explicit `unknown` state
//!
//! # Example
//!
//! ```rust
//! use otlab_core::{DnsLabel, Endpoint, ScenarioId};
//!
//! let id: ScenarioId = "scenario2".parse().unwrap();
//! assert_eq!(id.as_str(), "scenario2");
//!
//! let ns = DnsLabel::parse("otel-scenario2").unwrap();
//! assert_eq!(ns.as_str(), "otel-scenario2");
//!
//! assert!(Endpoint::parse("otel-collector:4318").is_err());
//! ```

#![warn(missing_docs)]

pub mod endpoint;
pub mod error;
pub mod keys;
pub mod label;
pub mod revision;
pub mod scenario;

// Re-exports
pub use endpoint::Endpoint;
pub use error::CoreError;
pub use label::{sanitize_label_value, validate_label_fragment, DnsLabel, MAX_LABEL_LEN};
pub use revision::{RevisionField, SourceRevisionInfo};
pub use scenario::{ComponentId, DeploymentPattern, ScenarioDescriptor, ScenarioId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for scenario resolution
    pub use crate::{
        ComponentId, CoreError, DeploymentPattern, DnsLabel, Endpoint, RevisionField,
        ScenarioDescriptor, ScenarioId, SourceRevisionInfo,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
