//! OTLab Scenario Registry
//!
//! The single source of truth mapping each [`ScenarioId`](otlab_core::ScenarioId)
//! to its [`ScenarioDescriptor`](otlab_core::ScenarioDescriptor).
//!
//! # Example
//!
//! ```rust
//! use otlab_core::ScenarioId;
//! use otlab_registry::ScenarioRegistry;
//!
//! let registry = ScenarioRegistry::builtin();
//! let descriptor = registry.lookup(ScenarioId::Scenario1).unwrap();
//! assert_eq!(descriptor.service_prefix.as_str(), "datadog");
//! ```

#![warn(missing_docs)]

pub mod builtin;
pub mod error;
pub mod file;
pub mod registry;

// Re-exports
pub use builtin::builtin_descriptors;
pub use error::{ConflictField, RegistryError, RegistryResult};
pub use file::RegistryDocument;
pub use registry::ScenarioRegistry;
