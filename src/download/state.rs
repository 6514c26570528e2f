//! Session state: the parse, select, download lifecycle of one user.

use std::fmt;

use uuid::Uuid;

use crate::api::MediaGateway;
use crate::download::orchestrator::{Orchestrator, RunOptions};
use crate::download::parse::{classify_input, fetch_media};
use crate::download::poller::{PollOutcome, TaskPoller};
use crate::download::progress::ProgressReporter;
use crate::download::run::OrchestrationRun;
use crate::download::selection::Selection;
use crate::download::task::DownloadTask;
use crate::error::SessionError;
use crate::media::MediaItem;
use crate::platform::Platform;

/// Top-level phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Parsing,
    Selecting,
    Downloading,
    Completed,
    Error,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Parsing => write!(f, "parsing"),
            SessionPhase::Selecting => write!(f, "selecting"),
            SessionPhase::Downloading => write!(f, "downloading"),
            SessionPhase::Completed => write!(f, "completed"),
            SessionPhase::Error => write!(f, "error"),
        }
    }
}

/// One user's session. Holds at most one media set and one run, or the task
/// of one whole-post download.
///
/// Every transition takes `&mut self`, so a session can only ever be driven
/// by one action sequence at a time. Sessions are independent of each other.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    phase: SessionPhase,
    url: Option<String>,
    platform: Option<Platform>,
    selection: Selection,
    last_error: Option<SessionError>,
    run: Option<OrchestrationRun>,
    direct: Option<DownloadTask>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: SessionPhase::Idle,
            url: None,
            platform: None,
            selection: Selection::default(),
            last_error: None,
            run: None,
            direct: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The URL of the current or last parse.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    /// Parsed items in display order.
    pub fn items(&self) -> &[MediaItem] {
        self.selection.items()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.selected_count()
    }

    /// Message to show the user, if any.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    /// The live or last run.
    pub fn run(&self) -> Option<&OrchestrationRun> {
        self.run.as_ref()
    }

    /// The task of the last whole-post download.
    pub fn direct_task(&self) -> Option<&DownloadTask> {
        self.direct.as_ref()
    }

    /// Result URLs of the last run in processing order, or of the last
    /// whole-post download.
    pub fn result_urls(&self) -> Vec<&str> {
        if let Some(run) = &self.run {
            return run.result_urls();
        }
        self.direct
            .as_ref()
            .and_then(|task| task.result_url.as_deref())
            .into_iter()
            .collect()
    }

    /// Classify and parse `url`, replacing any previous media set.
    ///
    /// Returns the number of items found. Unsupported URLs fail without any
    /// gateway call.
    pub async fn parse<G: MediaGateway + ?Sized>(
        &mut self,
        gateway: &G,
        url: &str,
    ) -> Result<usize, SessionError> {
        self.ensure_phase(
            "parse",
            &[SessionPhase::Idle, SessionPhase::Selecting, SessionPhase::Error],
        )?;

        let platform = self.classify(url)?;

        let url = url.trim();
        self.phase = SessionPhase::Parsing;
        self.url = Some(url.to_string());
        self.platform = Some(platform);
        tracing::debug!(session = %self.id, "Session parsing {}", url);

        match fetch_media(gateway, url, platform).await {
            Ok(items) => {
                let count = items.len();
                self.selection.replace(items);
                self.phase = SessionPhase::Selecting;
                Ok(count)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Download a whole post as one backend task, skipping parse and selection.
    ///
    /// The post URL is submitted without a media type and its task polled
    /// until it completes, fails or runs out of attempts. Ends in `completed`
    /// with the task, or in `error`.
    pub async fn download_direct<G, F>(
        &mut self,
        gateway: &G,
        url: &str,
        poller: TaskPoller,
        on_update: F,
    ) -> Result<&DownloadTask, SessionError>
    where
        G: MediaGateway + ?Sized,
        F: FnMut(&DownloadTask),
    {
        self.ensure_phase(
            "download",
            &[SessionPhase::Idle, SessionPhase::Selecting, SessionPhase::Error],
        )?;

        let platform = self.classify(url)?;

        let url = url.trim();
        self.phase = SessionPhase::Downloading;
        self.url = Some(url.to_string());
        self.platform = Some(platform);
        tracing::debug!(session = %self.id, "Session downloading post {}", url);

        let submitted = match gateway.submit_download(url, platform, None).await {
            Ok(submitted) => submitted,
            Err(e) => {
                tracing::warn!("Submitting post {} failed: {}", url, e);
                return Err(self.fail(e.into()));
            }
        };
        tracing::info!("Post submitted as task {}", submitted.task_id);

        match poller
            .poll_until_terminal(gateway, &submitted.task_id, on_update)
            .await
        {
            PollOutcome::Completed(task) if task.result_url.is_some() => {
                self.phase = SessionPhase::Completed;
                Ok(&*self.direct.insert(task))
            }
            PollOutcome::Completed(task) => {
                tracing::warn!("Task {} completed without a result URL", task.task_id);
                self.direct = Some(task);
                Err(self.fail(SessionError::TaskFailed(
                    "completed without a result URL".to_string(),
                )))
            }
            PollOutcome::Failed(task) => {
                let message = task
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "download failed".to_string());
                self.direct = Some(task);
                Err(self.fail(SessionError::TaskFailed(message)))
            }
            PollOutcome::TimedOut { .. } => Err(self.fail(SessionError::TimedOut)),
        }
    }

    /// Flip one item's selection. Returns the new state.
    pub fn toggle(&mut self, id: usize) -> Result<bool, SessionError> {
        self.ensure_phase("change the selection", &[SessionPhase::Selecting])?;
        self.selection
            .toggle(id)
            .ok_or(SessionError::UnknownItem(id))
    }

    /// Select all, or deselect all when everything is already selected.
    pub fn toggle_all(&mut self) -> Result<(), SessionError> {
        self.ensure_phase("change the selection", &[SessionPhase::Selecting])?;
        self.selection.toggle_all();
        Ok(())
    }

    /// Download every selected item and finish in `completed` or `error`.
    ///
    /// With nothing selected this fails without leaving `selecting`.
    pub async fn download<G: MediaGateway + ?Sized>(
        &mut self,
        gateway: &G,
        options: RunOptions,
        reporter: &dyn ProgressReporter,
    ) -> Result<&OrchestrationRun, SessionError> {
        self.ensure_phase("download", &[SessionPhase::Selecting])?;

        if self.selection.selected_count() == 0 {
            self.last_error = Some(SessionError::NothingSelected);
            return Err(SessionError::NothingSelected);
        }

        let platform = self.platform.ok_or(SessionError::InvalidState {
            action: "download",
            phase: self.phase,
        })?;
        let snapshot = self.selection.snapshot();

        self.phase = SessionPhase::Downloading;
        self.last_error = None;
        tracing::debug!(session = %self.id, "Session downloading {} item(s)", snapshot.len());

        let run = Orchestrator::new(gateway, platform, options, reporter)
            .run(snapshot)
            .await;

        if run.succeeded() == 0 {
            self.run = Some(run);
            return Err(self.fail(SessionError::AllItemsFailed));
        }

        self.phase = SessionPhase::Completed;
        Ok(&*self.run.insert(run))
    }

    /// Clear everything and return to `idle`.
    pub fn reset(&mut self) {
        tracing::debug!(session = %self.id, "Session reset from {}", self.phase);
        self.phase = SessionPhase::Idle;
        self.clear();
    }

    /// Classify a new input, dropping the previous media set and results.
    /// A rejected input leaves the session in `error` with nothing stale.
    fn classify(&mut self, url: &str) -> Result<Platform, SessionError> {
        self.clear();
        classify_input(url).map_err(|e| self.fail(e))
    }

    fn clear(&mut self) {
        self.url = None;
        self.platform = None;
        self.selection.clear();
        self.last_error = None;
        self.run = None;
        self.direct = None;
    }

    fn ensure_phase(
        &self,
        action: &'static str,
        allowed: &[SessionPhase],
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                action,
                phase: self.phase,
            })
        }
    }

    fn fail(&mut self, error: SessionError) -> SessionError {
        tracing::debug!(session = %self.id, "Session failed: {}", error);
        self.phase = SessionPhase::Error;
        self.last_error = Some(error.clone());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::api::types::TaskStatus;
    use crate::download::progress::SilentReporter;
    use crate::download::testing::{completed, failed, status, FakeGateway};
    use crate::error::GatewayError;

    const POST: &str = "https://www.threads.net/@user/post/123";

    fn options() -> RunOptions {
        RunOptions {
            poller: TaskPoller::new(Duration::from_millis(5), 3),
            ..Default::default()
        }
    }

    fn three_item_gateway() -> FakeGateway {
        FakeGateway::new().with_media(&[("video", "A"), ("image", "B"), ("image", "C")])
    }

    #[tokio::test]
    async fn test_unsupported_url_never_calls_gateway() {
        let gateway = three_item_gateway();
        let mut session = Session::new();

        let err = session
            .parse(&gateway, "https://www.youtube.com/watch?v=1")
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::UnsupportedUrl);
        assert_eq!(session.last_error(), Some(&SessionError::UnsupportedUrl));
        assert_eq!(session.phase(), SessionPhase::Error);
        assert_eq!(FakeGateway::calls(&gateway.parse_calls), 0);
    }

    #[tokio::test]
    async fn test_blank_url_is_unsupported() {
        let gateway = three_item_gateway();
        let mut session = Session::new();
        let err = session.parse(&gateway, "   ").await.unwrap_err();
        assert!(err.is_input_rejection());
        assert_eq!(FakeGateway::calls(&gateway.parse_calls), 0);
    }

    #[tokio::test]
    async fn test_parse_selects_everything() {
        let gateway = three_item_gateway();
        let mut session = Session::new();

        let count = session.parse(&gateway, POST).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(session.phase(), SessionPhase::Selecting);
        assert_eq!(session.platform(), Some(Platform::Threads));
        assert!(session.items().iter().all(|i| i.selected));
        assert_eq!(session.selected_count(), 3);
    }

    #[tokio::test]
    async fn test_parse_failure_keeps_backend_message() {
        let gateway = FakeGateway::new().with_parse_error(GatewayError::Backend {
            status: 404,
            message: "post not found".into(),
        });
        let mut session = Session::new();

        let err = session.parse(&gateway, POST).await.unwrap_err();

        assert_eq!(err.to_string(), "post not found");
        assert_eq!(session.phase(), SessionPhase::Error);
        assert!(session.items().is_empty());
    }

    #[tokio::test]
    async fn test_no_media_found() {
        let gateway = FakeGateway::new().with_media(&[]);
        let mut session = Session::new();
        let err = session.parse(&gateway, POST).await.unwrap_err();
        assert_eq!(err, SessionError::NoMediaFound);
        assert_eq!(session.phase(), SessionPhase::Error);
    }

    #[tokio::test]
    async fn test_error_is_retryable_and_reparse_replaces_items() {
        let gateway = three_item_gateway();
        let mut session = Session::new();
        session.parse(&gateway, "nope").await.unwrap_err();

        session.parse(&gateway, POST).await.unwrap();
        session.toggle(1).unwrap();
        assert_eq!(session.selected_count(), 2);

        session.parse(&gateway, POST).await.unwrap();
        assert_eq!(session.selected_count(), 3);
        assert_eq!(session.last_error(), None);
    }

    #[tokio::test]
    async fn test_nothing_selected_keeps_phase() {
        let gateway = three_item_gateway();
        let mut session = Session::new();
        session.parse(&gateway, POST).await.unwrap();
        session.toggle_all().unwrap();

        let err = session
            .download(&gateway, options(), &SilentReporter)
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::NothingSelected);
        assert_eq!(session.phase(), SessionPhase::Selecting);
        assert_eq!(FakeGateway::calls(&gateway.submit_calls), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_failure_completes_with_successful_urls() {
        let gateway = three_item_gateway()
            .with_task("A", "ta", vec![completed("/api/files/a.mp4")])
            .with_submit_error("B", GatewayError::Unavailable)
            .with_task("C", "tc", vec![completed("/api/files/c.jpg")]);
        let mut session = Session::new();
        session.parse(&gateway, POST).await.unwrap();

        let run = session
            .download(&gateway, options(), &SilentReporter)
            .await
            .unwrap();
        assert_eq!(run.result_urls(), vec!["/api/files/a.mp4", "/api/files/c.jpg"]);

        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.result_urls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_failed_is_error() {
        let gateway = three_item_gateway()
            .with_task("A", "ta", vec![failed("private")])
            .with_submit_error("B", GatewayError::Unavailable)
            .with_task("C", "tc", vec![status(TaskStatus::Processing, 5.0)]);
        let mut session = Session::new();
        session.parse(&gateway, POST).await.unwrap();

        let err = session
            .download(&gateway, options(), &SilentReporter)
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::AllItemsFailed);
        assert_eq!(err.to_string(), "all items failed");
        assert_eq!(session.phase(), SessionPhase::Error);
        assert_eq!(session.run().map(|r| r.completed()), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_selected_items_are_submitted() {
        let gateway = three_item_gateway()
            .with_task("A", "ta", vec![completed("/a")])
            .with_task("C", "tc", vec![completed("/c")]);
        let mut session = Session::new();
        session.parse(&gateway, POST).await.unwrap();
        session.toggle(2).unwrap();

        session
            .download(&gateway, options(), &SilentReporter)
            .await
            .unwrap();

        assert_eq!(
            *gateway.submitted_urls.lock().unwrap(),
            vec!["A".to_string(), "C".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_locked_after_run_and_reset_clears() {
        let gateway = three_item_gateway()
            .with_task("A", "ta", vec![completed("/a")])
            .with_task("B", "tb", vec![completed("/b")])
            .with_task("C", "tc", vec![completed("/c")]);
        let mut session = Session::new();
        session.parse(&gateway, POST).await.unwrap();
        session
            .download(&gateway, options(), &SilentReporter)
            .await
            .unwrap();

        assert!(matches!(
            session.toggle(1),
            Err(SessionError::InvalidState { .. })
        ));
        assert!(matches!(
            session.parse(&gateway, POST).await,
            Err(SessionError::InvalidState { .. })
        ));

        session.reset();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.items().is_empty());
        assert!(session.run().is_none());
        session.parse(&gateway, POST).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_input_while_selecting_drops_old_media() {
        let gateway = three_item_gateway();
        let mut session = Session::new();
        session.parse(&gateway, POST).await.unwrap();

        let err = session
            .parse(&gateway, "https://example.com/post/1")
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::UnsupportedUrl);
        assert_eq!(session.phase(), SessionPhase::Error);
        assert!(session.items().is_empty());
        assert_eq!(session.url(), None);
        assert_eq!(session.platform(), None);
        assert_eq!(FakeGateway::calls(&gateway.parse_calls), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_download_completes_single_task() {
        let gateway = FakeGateway::new().with_task(
            POST,
            "post1",
            vec![
                status(TaskStatus::Queued, 0.0),
                status(TaskStatus::Processing, 50.0),
                completed("/api/files/post1.mp4"),
            ],
        );
        let mut session = Session::new();
        let mut seen = Vec::new();

        let task = session
            .download_direct(&gateway, POST, TaskPoller::new(Duration::from_millis(5), 3), |t| {
                seen.push(t.progress_percent)
            })
            .await
            .unwrap();
        assert_eq!(task.result_url.as_deref(), Some("/api/files/post1.mp4"));

        assert_eq!(seen, vec![0, 50, 100]);
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.platform(), Some(Platform::Threads));
        assert_eq!(session.result_urls(), vec!["/api/files/post1.mp4"]);
        assert_eq!(*gateway.submitted_kinds.lock().unwrap(), vec![None]);
        assert_eq!(FakeGateway::calls(&gateway.parse_calls), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_download_failure_and_timeout() {
        let gateway = FakeGateway::new().with_task(POST, "post1", vec![failed("private post")]);
        let mut session = Session::new();
        let err = session
            .download_direct(&gateway, POST, options().poller, |_| {})
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::TaskFailed("private post".into()));
        assert_eq!(session.phase(), SessionPhase::Error);
        assert!(session.result_urls().is_empty());

        let gateway = FakeGateway::new().with_task(
            POST,
            "post2",
            vec![Err(GatewayError::Unavailable), status(TaskStatus::Processing, 10.0)],
        );
        let mut session = Session::new();
        let err = session
            .download_direct(&gateway, POST, options().poller, |_| {})
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::TimedOut);
        assert_eq!(FakeGateway::calls(&gateway.status_calls), 3);
    }

    #[tokio::test]
    async fn test_direct_download_rejects_before_submitting() {
        let gateway = FakeGateway::new().with_submit_error(POST, GatewayError::Unavailable);
        let mut session = Session::new();

        let err = session
            .download_direct(&gateway, "https://vimeo.com/1", options().poller, |_| {})
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::UnsupportedUrl);
        assert_eq!(FakeGateway::calls(&gateway.submit_calls), 0);

        let err = session
            .download_direct(&gateway, POST, options().poller, |_| {})
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::Gateway(GatewayError::Unavailable));
        assert_eq!(err.to_string(), "service unavailable");
        assert_eq!(session.phase(), SessionPhase::Error);
    }

    #[tokio::test]
    async fn test_unknown_item() {
        let gateway = three_item_gateway();
        let mut session = Session::new();
        session.parse(&gateway, POST).await.unwrap();
        assert_eq!(session.toggle(42), Err(SessionError::UnknownItem(42)));
    }

    #[tokio::test]
    async fn test_download_requires_parsed_session() {
        let gateway = three_item_gateway();
        let mut session = Session::new();
        let err = session
            .download(&gateway, options(), &SilentReporter)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidState {
                action: "download",
                phase: SessionPhase::Idle
            }
        );
    }
}
