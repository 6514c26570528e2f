//! Parse stage: classify a post URL and fetch its media items.

use crate::api::MediaGateway;
use crate::error::SessionError;
use crate::media::{materialize, MediaItem};
use crate::platform::{classify, Platform};

/// Classify user input, rejecting anything unrecognized before any network call.
pub fn classify_input(url: &str) -> Result<Platform, SessionError> {
    classify(url).ok_or(SessionError::UnsupportedUrl)
}

/// Ask the gateway to parse `url` and materialize the result.
///
/// An empty media list is a failure of its own.
pub async fn fetch_media<G: MediaGateway + ?Sized>(
    gateway: &G,
    url: &str,
    platform: Platform,
) -> Result<Vec<MediaItem>, SessionError> {
    tracing::info!("Parsing {} post: {}", platform.display_name(), url);

    let response = gateway.submit_parse(url, platform).await?;
    let items = materialize(&response.media);
    if items.is_empty() {
        tracing::info!("No downloadable media in {}", url);
        return Err(SessionError::NoMediaFound);
    }

    tracing::info!("Found {} media item(s)", items.len());
    Ok(items)
}
