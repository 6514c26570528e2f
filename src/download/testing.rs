//! Scripted in-memory gateway for download flow tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::types::{BackendMedia, ParseResponse, StatusPayload, TaskStatus, TaskSubmitted};
use crate::api::MediaGateway;
use crate::error::GatewayError;
use crate::media::MediaKind;
use crate::platform::Platform;

type StatusScript = VecDeque<Result<StatusPayload, GatewayError>>;

/// Gateway double with per-URL submission results and per-task status scripts.
///
/// The last scripted status of a task repeats forever.
pub(crate) struct FakeGateway {
    parse: Mutex<Result<ParseResponse, GatewayError>>,
    submissions: Mutex<HashMap<String, Result<String, GatewayError>>>,
    statuses: Mutex<HashMap<String, StatusScript>>,
    pub parse_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub submitted_urls: Mutex<Vec<String>>,
    pub submitted_kinds: Mutex<Vec<Option<MediaKind>>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            parse: Mutex::new(Ok(ParseResponse::default())),
            submissions: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            parse_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            submitted_urls: Mutex::new(Vec::new()),
            submitted_kinds: Mutex::new(Vec::new()),
        }
    }

    /// Parse result listing `(type, url)` entries.
    pub fn with_media(self, media: &[(&str, &str)]) -> Self {
        let media = media
            .iter()
            .map(|(kind, url)| BackendMedia {
                kind: kind.to_string(),
                url: url.to_string(),
                thumbnail: None,
                duration: None,
            })
            .collect();
        *self.parse.lock().unwrap() = Ok(ParseResponse { media });
        self
    }

    pub fn with_parse_error(self, err: GatewayError) -> Self {
        *self.parse.lock().unwrap() = Err(err);
        self
    }

    /// Submitting `source_url` yields `task_id`, then polls walk `script`.
    pub fn with_task(
        self,
        source_url: &str,
        task_id: &str,
        script: Vec<Result<StatusPayload, GatewayError>>,
    ) -> Self {
        self.submissions
            .lock()
            .unwrap()
            .insert(source_url.to_string(), Ok(task_id.to_string()));
        self.statuses
            .lock()
            .unwrap()
            .insert(task_id.to_string(), script.into());
        self
    }

    pub fn with_submit_error(self, source_url: &str, err: GatewayError) -> Self {
        self.submissions
            .lock()
            .unwrap()
            .insert(source_url.to_string(), Err(err));
        self
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub(crate) fn status(status: TaskStatus, progress: f64) -> Result<StatusPayload, GatewayError> {
    Ok(StatusPayload {
        task_id: None,
        status,
        progress: Some(progress),
        download_url: None,
        error: None,
    })
}

pub(crate) fn completed(url: &str) -> Result<StatusPayload, GatewayError> {
    Ok(StatusPayload {
        task_id: None,
        status: TaskStatus::Completed,
        progress: Some(100.0),
        download_url: Some(url.to_string()),
        error: None,
    })
}

pub(crate) fn failed(message: &str) -> Result<StatusPayload, GatewayError> {
    Ok(StatusPayload {
        task_id: None,
        status: TaskStatus::Failed,
        progress: None,
        download_url: None,
        error: Some(message.to_string()),
    })
}

#[async_trait]
impl MediaGateway for FakeGateway {
    async fn submit_parse(
        &self,
        _url: &str,
        _platform: Platform,
    ) -> Result<ParseResponse, GatewayError> {
        self.parse_calls.fetch_add(1, Ordering::SeqCst);
        self.parse.lock().unwrap().clone()
    }

    async fn submit_download(
        &self,
        source_url: &str,
        _platform: Platform,
        kind: Option<MediaKind>,
    ) -> Result<TaskSubmitted, GatewayError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted_urls
            .lock()
            .unwrap()
            .push(source_url.to_string());
        self.submitted_kinds.lock().unwrap().push(kind);
        match self.submissions.lock().unwrap().get(source_url) {
            Some(Ok(task_id)) => Ok(TaskSubmitted {
                task_id: task_id.clone(),
            }),
            Some(Err(e)) => Err(e.clone()),
            None => Err(GatewayError::Backend {
                status: 400,
                message: format!("unscripted url {source_url}"),
            }),
        }
    }

    async fn get_status(&self, task_id: &str) -> Result<StatusPayload, GatewayError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock().unwrap();
        let script = statuses
            .get_mut(task_id)
            .ok_or(GatewayError::Backend {
                status: 404,
                message: "task not found".into(),
            })?;
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}
