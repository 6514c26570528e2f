//! Bounded fixed-interval task polling.

use std::time::Duration;

use tokio::time::sleep;

use crate::api::types::TaskStatus;
use crate::api::MediaGateway;
use crate::download::task::DownloadTask;

/// Default delay before each status query.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Default number of status queries before giving up (two minutes at the default interval).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Terminal result of polling one task.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The backend reported `completed`.
    Completed(DownloadTask),
    /// The backend reported `failed`.
    Failed(DownloadTask),
    /// No terminal status was observed within the attempt budget.
    TimedOut { attempts: u32 },
}

/// Polls a task's status until it is terminal or the budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPoller {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for TaskPoller {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl TaskPoller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Poll `task_id` every `interval`, at most `max_attempts` times.
    ///
    /// Each attempt waits one interval and then queries the status once.
    /// A failed query is skipped and polling continues; it neither succeeds
    /// nor fails the task. `on_update` sees every status that was read.
    pub async fn poll_until_terminal<G, F>(
        &self,
        gateway: &G,
        task_id: &str,
        mut on_update: F,
    ) -> PollOutcome
    where
        G: MediaGateway + ?Sized,
        F: FnMut(&DownloadTask),
    {
        for attempt in 1..=self.max_attempts {
            sleep(self.interval).await;

            let payload = match gateway.get_status(task_id).await {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::debug!(
                        "Status poll {}/{} for task {} failed: {}",
                        attempt,
                        self.max_attempts,
                        task_id,
                        e
                    );
                    continue;
                }
            };

            let task = DownloadTask::from_payload(task_id, payload);
            on_update(&task);

            match task.status {
                TaskStatus::Completed => {
                    tracing::debug!("Task {} completed after {} polls", task_id, attempt);
                    return PollOutcome::Completed(task);
                }
                TaskStatus::Failed => {
                    tracing::debug!("Task {} failed after {} polls", task_id, attempt);
                    return PollOutcome::Failed(task);
                }
                TaskStatus::Queued | TaskStatus::Processing => {}
            }
        }

        tracing::warn!(
            "Task {} timed out: no terminal status after {} polls",
            task_id,
            self.max_attempts
        );
        PollOutcome::TimedOut {
            attempts: self.max_attempts,
        }
    }
}
