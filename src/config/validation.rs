//! Configuration validation logic.

use std::net::SocketAddr;

use url::Url;

use crate::config::loader::Config;
use crate::download::MAX_CONCURRENCY;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_bind(&config.gateway.bind)?;
    validate_http_url("backend.base_url", &config.backend.base_url)?;
    validate_api_prefix(&config.backend.api_prefix)?;
    validate_http_url("client.gateway_url", &config.client.gateway_url)?;
    validate_polling(config.client.poll_interval_ms, config.client.max_poll_attempts)?;
    validate_concurrency(config.client.concurrency)?;

    Ok(())
}

/// Validate the gateway listen address.
pub fn validate_bind(bind: &str) -> Result<SocketAddr> {
    bind.parse::<SocketAddr>()
        .map_err(|e| Error::ConfigValidation {
            field: "gateway.bind".to_string(),
            message: format!("'{}' is not a socket address: {}", bind, e),
        })
}

/// Validate an http(s) base URL.
pub fn validate_http_url(field: &str, value: &str) -> Result<Url> {
    if value.trim().is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }

    let url = Url::parse(value).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("Unsupported scheme '{}' (use http or https)", url.scheme()),
        });
    }

    Ok(url)
}

/// Validate the backend route prefix.
pub fn validate_api_prefix(prefix: &str) -> Result<()> {
    if !prefix.is_empty() && !prefix.starts_with('/') {
        return Err(Error::ConfigValidation {
            field: "backend.api_prefix".to_string(),
            message: format!("Prefix '{}' must be empty or start with '/'", prefix),
        });
    }
    Ok(())
}

/// Validate the polling budget.
pub fn validate_polling(interval_ms: u64, max_attempts: u32) -> Result<()> {
    if interval_ms == 0 {
        return Err(Error::ConfigValidation {
            field: "client.poll_interval_ms".to_string(),
            message: "Poll interval must be at least 1 ms".to_string(),
        });
    }

    if max_attempts == 0 {
        return Err(Error::ConfigValidation {
            field: "client.max_poll_attempts".to_string(),
            message: "At least one poll attempt is required".to_string(),
        });
    }

    Ok(())
}

/// Validate the number of items in flight.
pub fn validate_concurrency(concurrency: usize) -> Result<()> {
    if concurrency == 0 || concurrency > MAX_CONCURRENCY {
        return Err(Error::ConfigValidation {
            field: "client.concurrency".to_string(),
            message: format!(
                "Concurrency must be between 1 and {} (got {})",
                MAX_CONCURRENCY, concurrency
            ),
        });
    }
    Ok(())
}
