//! Core functionality for Federa pods.
//!
//! This crate provides the ambient pieces shared across the Federa workspace:
//! pod configuration, the core error type, and logging initialisation.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, FederationConfig, KeyEntry, LoggingConfig};
pub use error::{CoreError, Result};
