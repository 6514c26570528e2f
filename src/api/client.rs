//! HTTP client for the gateway's JSON endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::traits::MediaGateway;
use crate::api::types::{
    DownloadRequest, ErrorBody, ParseRequest, ParseResponse, StatusPayload, TaskSubmitted,
};
use crate::error::{
    Error, GatewayError, Result, PARSE_FAILED_MSG, STATUS_FAILED_MSG, SUBMIT_FAILED_MSG,
};
use crate::media::MediaKind;
use crate::platform::Platform;

/// Client for a running gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    files: Client,
    base_url: Url,
}

impl GatewayClient {
    /// Create a client for the gateway at `base_url`.
    ///
    /// `timeout` bounds JSON calls. Result files are streamed and only
    /// bounded by the connect timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Keep any path prefix when joining relative endpoints.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

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
        })
    }

    /// The gateway base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::InvalidInput(format!("Invalid gateway path: {}", e)))
    }

    /// Resolve a task result URL: relative ones live on the gateway.
    pub fn resolve_result_url(&self, result_url: &str) -> Result<Url> {
        match Url::parse(result_url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(self.base_url.join(result_url.trim_start_matches('/'))?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Open a completed artifact for streaming.
    pub async fn open_result(&self, url: &Url) -> Result<Response> {
        tracing::debug!("GET {}", url);
        let response = self.files.get(url.clone()).send().await.map_err(|e| {
            tracing::warn!("Failed to reach {}: {}", url, e);
            GatewayError::Unavailable
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.ok();
            return Err(GatewayError::from_wire(
                status.as_u16(),
                body.map(|b| b.error),
                crate::error::FILE_NOT_FOUND_MSG,
            )
            .into());
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> std::result::Result<T, GatewayError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Gateway unreachable: {}", e);
            GatewayError::Unavailable
        })?;
        read_json(response, fallback).await
    }
}

/// Decode a gateway response, rebuilding the normalized failure on non-success.
async fn read_json<T: DeserializeOwned>(
    response: Response,
    fallback: &str,
) -> std::result::Result<T, GatewayError> {
    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if !status.is_success() {
        let body = response.json::<ErrorBody>().await.ok();
        return Err(GatewayError::from_wire(
            status.as_u16(),
            body.map(|b| b.error),
            fallback,
        ));
    }

    response.json::<T>().await.map_err(|e| {
        tracing::warn!("Unreadable gateway response: {}", e);
        GatewayError::Unavailable
    })
}

#[async_trait]
impl MediaGateway for GatewayClient {
    async fn submit_parse(
        &self,
        url: &str,
        platform: Platform,
    ) -> std::result::Result<ParseResponse, GatewayError> {
        let endpoint = self.endpoint("api/parse")?;
        tracing::debug!("POST {}", endpoint);
        let body = ParseRequest {
            url: url.to_string(),
            platform: Some(platform),
        };
        self.send_json(self.client.post(endpoint).json(&body), PARSE_FAILED_MSG)
            .await
    }

    async fn submit_download(
        &self,
        source_url: &str,
        platform: Platform,
        kind: Option<MediaKind>,
    ) -> std::result::Result<TaskSubmitted, GatewayError> {
        let endpoint = self.endpoint("api/download")?;
        tracing::debug!("POST {}", endpoint);
        let body = DownloadRequest {
            url: source_url.to_string(),
            platform: Some(platform),
            media_type: kind,
        };
        self.send_json(self.client.post(endpoint).json(&body), SUBMIT_FAILED_MSG)
            .await
    }

    async fn get_status(&self, task_id: &str) -> std::result::Result<StatusPayload, GatewayError> {
        let mut endpoint = self.endpoint("api/status/")?;
        endpoint
            .path_segments_mut()
            .map_err(|_| GatewayError::InvalidInput("Gateway URL cannot have paths".into()))?
            .pop_if_empty()
            .push(task_id);
        tracing::debug!("GET {}", endpoint);
        self.send_json(self.client.get(endpoint), STATUS_FAILED_MSG)
            .await
    }
}
