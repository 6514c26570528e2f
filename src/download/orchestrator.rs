//! Drives a snapshot of selected items through submit and poll.

use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt};

use crate::api::MediaGateway;
use crate::download::poller::{PollOutcome, TaskPoller};
use crate::download::progress::ProgressReporter;
use crate::download::run::{percent_of, ItemOutcome, ItemReport, OrchestrationRun};
use crate::media::MediaItem;
use crate::platform::Platform;

/// Upper bound for the opt-in concurrent mode.
pub const MAX_CONCURRENCY: usize = 16;

/// How items of one run are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// One item's submit and poll cycle finishes before the next item is submitted.
    #[default]
    Sequential,
    /// Up to `limit` items in flight; results still land in snapshot order.
    Concurrent { limit: usize },
}

impl RunMode {
    /// `1` (or less) means sequential.
    pub fn from_concurrency(concurrency: usize) -> Self {
        if concurrency <= 1 {
            RunMode::Sequential
        } else {
            RunMode::Concurrent {
                limit: concurrency.min(MAX_CONCURRENCY),
            }
        }
    }
}

/// Scheduling and polling settings for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: RunMode,
    pub poller: TaskPoller,
}

/// Runs one snapshot against a gateway.
pub struct Orchestrator<'a, G: ?Sized> {
    gateway: &'a G,
    platform: Platform,
    options: RunOptions,
    reporter: &'a dyn ProgressReporter,
}

impl<'a, G: MediaGateway + ?Sized> Orchestrator<'a, G> {
    pub fn new(
        gateway: &'a G,
        platform: Platform,
        options: RunOptions,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            gateway,
            platform,
            options,
            reporter,
        }
    }

    /// Process every item of `snapshot` and return the finished run.
    ///
    /// Item failures are recorded, never returned as errors.
    pub async fn run(&self, snapshot: Vec<MediaItem>) -> OrchestrationRun {
        let mut run = OrchestrationRun::new(snapshot);
        let total = run.total();
        let done = AtomicUsize::new(0);

        tracing::info!("Starting run over {} item(s) ({:?})", total, self.options.mode);
        self.reporter.run_started(total);

        match self.options.mode {
            RunMode::Sequential => {
                for item in run.items().to_vec() {
                    let report = self.process_item(item, &done, total).await;
                    run.record(report);
                }
            }
            RunMode::Concurrent { limit } => {
                let reports: Vec<ItemReport> = stream::iter(run.items().to_vec())
                    .map(|item| self.process_item(item, &done, total))
                    .buffered(limit.max(1))
                    .collect()
                    .await;
                for report in reports {
                    run.record(report);
                }
            }
        }

        run.finish();
        tracing::info!(
            "Run finished: {} succeeded, {} failed ({} timed out)",
            run.succeeded(),
            run.failed(),
            run.timed_out()
        );
        self.reporter.run_finished(&run);
        run
    }

    async fn process_item(&self, item: MediaItem, done: &AtomicUsize, total: usize) -> ItemReport {
        self.reporter.item_started(&item);

        let (task_id, outcome) = match self
            .gateway
            .submit_download(&item.source_url, self.platform, Some(item.kind))
            .await
        {
            Ok(submitted) => {
                tracing::debug!("Item {} submitted as task {}", item.id, submitted.task_id);
                let outcome = self.await_task(&item, &submitted.task_id).await;
                (Some(submitted.task_id), outcome)
            }
            Err(e) => {
                tracing::warn!("Submitting item {} failed: {}", item.id, e);
                (
                    None,
                    ItemOutcome::SubmitFailed {
                        message: e.to_string(),
                    },
                )
            }
        };

        let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
        let report = ItemReport {
            item,
            task_id,
            outcome,
        };
        self.reporter
            .item_finished(&report, percent_of(finished, total));
        report
    }

    async fn await_task(&self, item: &MediaItem, task_id: &str) -> ItemOutcome {
        let outcome = self
            .options
            .poller
            .poll_until_terminal(self.gateway, task_id, |task| {
                self.reporter.task_updated(item, task)
            })
            .await;

        match outcome {
            PollOutcome::Completed(task) => match task.result_url {
                Some(result_url) => ItemOutcome::Completed { result_url },
                None => {
                    tracing::warn!("Task {} completed without a result URL", task_id);
                    ItemOutcome::Failed {
                        message: "completed without a result URL".to_string(),
                    }
                }
            },
            PollOutcome::Failed(task) => {
                let message = task
                    .error_message
                    .unwrap_or_else(|| "download failed".to_string());
                tracing::warn!("Task {} failed: {}", task_id, message);
                ItemOutcome::Failed { message }
            }
            PollOutcome::TimedOut { attempts } => {
                tracing::warn!("Task {} timed out after {} polls", task_id, attempts);
                ItemOutcome::TimedOut { attempts }
            }
        }
    }
}
