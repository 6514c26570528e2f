//! Configuration module for postgrab.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - CLI argument and environment merging (see `cli`)
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{BackendConfig, ClientConfig, Config, GatewayConfig};
pub use validation::validate_config;
