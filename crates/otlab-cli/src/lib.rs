//! OTLab CLI
//!
//! The `otlab` binary: lists scenarios, resolves them with overrides and
//! renders metadata, Helm values and deploy plans. Output goes to stdout,
//! logs to stderr.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use commands::{Lab, OutputFormat, ValuesFormat};
pub use config::{ConfigError, LabConfig, CONFIG_FILE_NAME};
