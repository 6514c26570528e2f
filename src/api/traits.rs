//! The gateway seam used by the parse and download flows.

use async_trait::async_trait;

use crate::api::types::{ParseResponse, StatusPayload, TaskSubmitted};
use crate::error::GatewayError;
use crate::media::MediaKind;
use crate::platform::Platform;

/// The three JSON operations the session drives.
///
/// Implemented over HTTP by [`crate::api::GatewayClient`]. Every failure is a
/// normalized [`GatewayError`].
#[async_trait]
pub trait MediaGateway: Send + Sync {
    /// Ask the backend to parse a post URL into media entries.
    async fn submit_parse(
        &self,
        url: &str,
        platform: Platform,
    ) -> Result<ParseResponse, GatewayError>;

    /// Submit a download task for one media unit, or for a whole post when
    /// `kind` is `None`.
    async fn submit_download(
        &self,
        source_url: &str,
        platform: Platform,
        kind: Option<MediaKind>,
    ) -> Result<TaskSubmitted, GatewayError>;

    /// Read the current status of a task.
    async fn get_status(&self, task_id: &str) -> Result<StatusPayload, GatewayError>;
}
