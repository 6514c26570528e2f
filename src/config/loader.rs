//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::download::{RunMode, RunOptions, TaskPoller};
use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub client: ClientConfig,
}

/// Gateway server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Listen address.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// `Cache-Control: public, max-age=<n>` for proxied files.
    #[serde(default = "default_file_cache_max_age")]
    pub file_cache_max_age_secs: u64,

    /// Timeout for backend JSON calls. File streaming is not bounded by it.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            file_cache_max_age_secs: default_file_cache_max_age(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Location of the media-extraction backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend origin, e.g. `http://localhost:7988`.
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Prefix of the backend routes (`/api` puts parse at `/api/parse`).
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            api_prefix: default_api_prefix(),
        }
    }
}

/// Settings for driving a session against a gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Gateway base URL.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Delay before each status query.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Status queries per task before it counts as timed out.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Items in flight at once. 1 processes items strictly one after another.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Where finished files are saved.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Whether to show progress bars.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            poll_interval_ms: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
            concurrency: default_concurrency(),
            download_directory: None,
            show_progress: true,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_file_cache_max_age() -> u64 {
    3600
}

fn default_request_timeout() -> u64 {
    30
}

fn default_backend_url() -> String {
    "http://localhost:7988".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_poll_interval() -> u64 {
    2000
}

fn default_max_poll_attempts() -> u32 {
    60
}

fn default_concurrency() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from postgrab.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Scheduling and polling settings for download runs.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            mode: RunMode::from_concurrency(self.client.concurrency),
            poller: TaskPoller::new(
                Duration::from_millis(self.client.poll_interval_ms),
                self.client.max_poll_attempts,
            ),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.gateway.bind, "127.0.0.1:3000");
        assert_eq!(config.backend.base_url, "http://localhost:7988");
        assert_eq!(config.client.poll_interval_ms, 2000);
        assert_eq!(config.client.max_poll_attempts, 60);

        let options = config.run_options();
        assert_eq!(options.mode, RunMode::Sequential);
        assert_eq!(options.poller, TaskPoller::default());
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [backend]
            base_url = "http://backend:8000"

            [client]
            concurrency = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "http://backend:8000");
        assert_eq!(config.backend.api_prefix, "/api");
        assert_eq!(config.run_options().mode, RunMode::Concurrent { limit: 3 });
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postgrab.toml");

        let mut config = Config::default();
        config.client.download_directory = Some(PathBuf::from("/tmp/grabs"));
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(
            loaded.client.download_directory,
            Some(PathBuf::from("/tmp/grabs"))
        );
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
