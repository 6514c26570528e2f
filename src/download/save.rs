//! Saving finished artifacts to disk.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use indicatif::ProgressBar;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::GatewayClient;
use crate::error::{Error, Result};
use crate::fs::{filename_from_url, make_unique_filename};
use crate::output::create_download_bar;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Download a task's result into `target_dir`.
///
/// Relative result URLs are fetched from the gateway. An existing file of
/// the same name is kept and the new one gets a numbered suffix.
pub async fn save_result(
    client: &GatewayClient,
    result_url: &str,
    target_dir: &Path,
    show_progress: bool,
) -> Result<PathBuf> {
    let url = client.resolve_result_url(result_url)?;
    let filename = filename_from_url(&url)?;

    tokio::fs::create_dir_all(target_dir).await?;
    let output_path = make_unique_filename(&target_dir.join(&filename));

    let response = client.open_result(&url).await?;

    let content_length = response.content_length();
    let progress = if show_progress
        && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false)
    {
        Some(create_download_bar(content_length.unwrap_or(0)))
    } else {
        None
    };

    let written = match write_body(response, &output_path, progress.as_ref()).await {
        Ok(written) => written,
        Err(e) => {
            if let Some(pb) = progress {
                pb.abandon();
            }
            if let Err(remove_err) = tokio::fs::remove_file(&output_path).await {
                tracing::debug!(
                    "Could not remove partial file {}: {}",
                    output_path.display(),
                    remove_err
                );
            }
            return Err(e);
        }
    };

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    tracing::info!("Saved {} ({} bytes)", output_path.display(), written);
    Ok(output_path)
}

async fn write_body(
    response: reqwest::Response,
    output_path: &Path,
    progress: Option<&ProgressBar>,
) -> Result<u64> {
    let mut file = File::create(output_path).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if let Some(pb) = progress {
            pb.set_position(downloaded);
        }
    }

    file.flush().await?;
    Ok(downloaded)
}
