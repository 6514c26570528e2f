//! HTTP client for the media-extraction backend.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use url::{Origin, Url};

use crate::api::types::BackendErrorBody;
use crate::config::BackendConfig;
use crate::error::{Error, GatewayError, Result, FILE_NOT_FOUND_MSG};

/// Forwards gateway requests to the backend's `{prefix}/parse`,
/// `{prefix}/download`, `{prefix}/status/{id}` and `{prefix}/files/{name}`.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    files: Client,
    base_url: Url,
    origin: Origin,
}

impl BackendClient {
    /// Create a client for the configured backend.
    ///
    /// `timeout` bounds JSON calls. File downloads are streamed and only
    /// bounded by the connect timeout.
    pub fn new(config: &BackendConfig, timeout: Duration) -> Result<Self> {
        let origin_url = Url::parse(&config.base_url)?;
        let origin = origin_url.origin();

        let mut base_url = origin_url;
        let path = format!(
            "{}{}/",
            base_url.path().trim_end_matches('/'),
            config.api_prefix.trim_end_matches('/')
        );
        base_url.set_path(&path);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        let files = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            files,
            base_url,
            origin,
        })
    }

    /// Backend route prefix as an absolute URL ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidInput("Backend URL cannot have paths".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Forward a parse request body verbatim.
    pub async fn parse(&self, body: &Value, fallback: &str) -> std::result::Result<Value, GatewayError> {
        let url = self.endpoint(&["parse"])?;
        self.forward(self.client.post(url).json(body), fallback).await
    }

    /// Forward a download submission body verbatim.
    pub async fn download(
        &self,
        body: &Value,
        fallback: &str,
    ) -> std::result::Result<Value, GatewayError> {
        let url = self.endpoint(&["download"])?;
        self.forward(self.client.post(url).json(body), fallback).await
    }

    /// Query a task's status.
    pub async fn status(
        &self,
        task_id: &str,
        fallback: &str,
    ) -> std::result::Result<Value, GatewayError> {
        let url = self.endpoint(&["status", task_id])?;
        self.forward(self.client.get(url), fallback).await
    }

    /// Open a finished artifact for streaming.
    pub async fn file(&self, filename: &str) -> std::result::Result<Response, GatewayError> {
        let url = self.endpoint(&["files", filename])?;
        tracing::debug!("GET {}", url);

        let response = self.files.get(url).send().await.map_err(unreachable_backend)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::FileNotFound);
        }
        Err(backend_failure(response, FILE_NOT_FOUND_MSG).await)
    }

    /// Hide the backend's location in a task result URL.
    ///
    /// A URL on the backend's origin under `{base}{prefix}/files/<name>`
    /// becomes the gateway's `/api/files/<name>`, query kept. Any other URL
    /// is returned unchanged.
    pub fn rewrite_result_url(&self, result_url: &str) -> String {
        let url = match Url::parse(result_url) {
            Ok(url) if url.origin() == self.origin => url,
            _ => return result_url.to_string(),
        };

        let files_prefix = format!("{}files/", self.base_url.path());
        let name = match url.path().strip_prefix(&files_prefix) {
            Some(name) if !name.is_empty() && !name.contains('/') => name,
            _ => return result_url.to_string(),
        };

        match url.query() {
            Some(query) => format!("/api/files/{}?{}", name, query),
            None => format!("/api/files/{}", name),
        }
    }

    async fn forward(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> std::result::Result<Value, GatewayError> {
        let response = request.send().await.map_err(unreachable_backend)?;
        let status = response.status();
        tracing::debug!("Backend responded {}", status);

        if !status.is_success() {
            return Err(backend_failure(response, fallback).await);
        }

        response.json::<Value>().await.map_err(|e| {
            tracing::error!("Unreadable backend response: {}", e);
            GatewayError::Unavailable
        })
    }
}

fn unreachable_backend(e: reqwest::Error) -> GatewayError {
    tracing::error!("Backend unreachable: {}", e);
    GatewayError::Unavailable
}

/// Build the normalized failure for a non-success backend response.
async fn backend_failure(response: Response, fallback: &str) -> GatewayError {
    let status = response.status().as_u16();
    let message = response
        .json::<BackendErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message())
        .unwrap_or_else(|| fallback.to_string());
    tracing::warn!("Backend failure {}: {}", status, message);
    GatewayError::Backend { status, message }
}
