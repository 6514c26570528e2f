//! Gateway API module.
//!
//! This module provides:
//! - Wire types shared by the backend, gateway and clients
//! - The `MediaGateway` seam the download flow is driven through
//! - An HTTP client for the gateway's JSON endpoints

pub mod client;
pub mod traits;
pub mod types;

pub use client::GatewayClient;
pub use traits::MediaGateway;
pub use types::*;
