//! Progress notifications emitted while a run is in flight.

use crate::download::run::{ItemReport, OrchestrationRun};
use crate::download::task::DownloadTask;
use crate::media::MediaItem;

/// Receives run events. Every method defaults to doing nothing.
pub trait ProgressReporter: Send + Sync {
    fn run_started(&self, _total: usize) {}

    fn item_started(&self, _item: &MediaItem) {}

    /// Latest status read for an item's task.
    fn task_updated(&self, _item: &MediaItem, _task: &DownloadTask) {}

    /// An item reached its outcome; `run_percent` is the run-level progress.
    fn item_finished(&self, _report: &ItemReport, _run_percent: u8) {}

    fn run_finished(&self, _run: &OrchestrationRun) {}
}

/// Reporter that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
