//! Backend-side download task as observed through polling.

use crate::api::types::{StatusPayload, TaskStatus};

/// One backend unit of work for one media item.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadTask {
    /// Opaque id issued by the backend.
    pub task_id: String,

    /// Latest reported status.
    pub status: TaskStatus,

    /// Latest reported progress, 0-100. Not assumed monotonic.
    pub progress_percent: u8,

    /// Set only when completed.
    pub result_url: Option<String>,

    /// Set only when failed.
    pub error_message: Option<String>,
}

impl DownloadTask {
    /// Build the task view from a status payload.
    pub fn from_payload(task_id: &str, payload: StatusPayload) -> Self {
        let progress_percent = payload.progress.map(clamp_percent).unwrap_or(0);
        let result_url = match payload.status {
            TaskStatus::Completed => payload.download_url.filter(|u| !u.trim().is_empty()),
            _ => None,
        };
        let error_message = match payload.status {
            TaskStatus::Failed => payload.error,
            _ => None,
        };

        Self {
            task_id: payload.task_id.unwrap_or_else(|| task_id.to_string()),
            status: payload.status,
            progress_percent,
            result_url,
            error_message,
        }
    }
}

fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.clamp(0.0, 100.0) as u8
    }
}
