//! Aggregate state of one orchestration run.

use chrono::{DateTime, Utc};

use crate::media::MediaItem;

/// How one selected item ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The task completed with a result URL.
    Completed { result_url: String },
    /// The backend reported the task as failed.
    Failed { message: String },
    /// The download could not be submitted at all.
    SubmitFailed { message: String },
    /// Polling ran out of attempts.
    TimedOut { attempts: u32 },
}

impl ItemOutcome {
    pub fn result_url(&self) -> Option<&str> {
        match self {
            ItemOutcome::Completed { result_url } => Some(result_url),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Completed { .. })
    }

    /// Short status word for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            ItemOutcome::Completed { .. } => "completed",
            ItemOutcome::Failed { .. } => "failed",
            ItemOutcome::SubmitFailed { .. } => "submission failed",
            ItemOutcome::TimedOut { .. } => "timed out",
        }
    }
}

/// Result for one item of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub item: MediaItem,
    /// Absent when submission failed.
    pub task_id: Option<String>,
    pub outcome: ItemOutcome,
}

/// One pass over a fixed snapshot of selected items.
#[derive(Debug, Clone)]
pub struct OrchestrationRun {
    items: Vec<MediaItem>,
    reports: Vec<ItemReport>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl OrchestrationRun {
    /// Start a run over `items`; the snapshot never changes afterwards.
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items,
            reports: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// The immutable snapshot, in processing order.
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Per-item results recorded so far, in processing order.
    pub fn reports(&self) -> &[ItemReport] {
        &self.reports
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn completed(&self) -> usize {
        self.reports.len()
    }

    pub fn record(&mut self, report: ItemReport) {
        self.reports.push(report);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Overall progress: items done over items selected, rounded down; 100 once finished.
    pub fn progress_percent(&self) -> u8 {
        if self.is_finished() {
            return 100;
        }
        percent_of(self.completed(), self.total())
    }

    /// Result URLs of successful items, in processing order.
    pub fn result_urls(&self) -> Vec<&str> {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.result_url())
            .collect()
    }

    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.completed() - self.succeeded()
    }

    pub fn timed_out(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::TimedOut { .. }))
            .count()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Wall-clock duration, up to now for an unfinished run.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }
}

/// `floor(done / total * 100)`, with an empty run counting as done.
pub fn percent_of(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done.min(total) * 100) / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;

    fn item(id: usize) -> MediaItem {
        MediaItem::new(id, MediaKind::Video, format!("https://cdn/{id}.mp4"))
    }

    fn report(id: usize, outcome: ItemOutcome) -> ItemReport {
        ItemReport {
            item: item(id),
            task_id: None,
            outcome,
        }
    }

    #[test]
    fn test_percent_rounds_down() {
        assert_eq!(percent_of(0, 3), 0);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 66);
        assert_eq!(percent_of(3, 3), 100);
        assert_eq!(percent_of(0, 0), 100);
    }

    #[test]
    fn test_progress_and_aggregation() {
        let mut run = OrchestrationRun::new(vec![item(1), item(2), item(3)]);
        assert_eq!(run.progress_percent(), 0);

        run.record(report(
            1,
            ItemOutcome::Completed {
                result_url: "/api/files/1.mp4".into(),
            },
        ));
        run.record(report(2, ItemOutcome::TimedOut { attempts: 60 }));
        assert_eq!(run.progress_percent(), 66);

        run.record(report(
            3,
            ItemOutcome::Completed {
                result_url: "/api/files/3.mp4".into(),
            },
        ));
        run.finish();

        assert_eq!(run.progress_percent(), 100);
        assert_eq!(run.result_urls(), vec!["/api/files/1.mp4", "/api/files/3.mp4"]);
        assert_eq!(run.succeeded(), 2);
        assert_eq!(run.failed(), 1);
        assert_eq!(run.timed_out(), 1);
    }
}
