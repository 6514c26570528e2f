//! Progress bar utilities.

use indicatif::{ProgressBar, ProgressStyle};

use crate::download::{DownloadTask, ItemReport, OrchestrationRun, ProgressReporter};
use crate::media::MediaItem;

/// Create a progress bar for downloads.
pub fn create_download_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar
}

/// Create a progress bar for item counts.
pub fn create_item_bar(total: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar.set_message(message.to_string());
    bar
}

/// Console reporter for a download run: one bar over the selected items,
/// with the current item's task status as its message.
pub struct RunProgress {
    bar: ProgressBar,
}

impl RunProgress {
    pub fn new() -> Self {
        let bar = create_item_bar(0, "");
        bar.set_prefix("  0%");
        Self { bar }
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for RunProgress {
    fn run_started(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar
            .enable_steady_tick(std::time::Duration::from_millis(100));
    }

    fn item_started(&self, item: &MediaItem) {
        self.bar.set_message(format!("{} submitting", item.label()));
    }

    fn task_updated(&self, item: &MediaItem, task: &DownloadTask) {
        self.bar.set_message(format!(
            "{} {} {}%",
            item.label(),
            task.status.as_str(),
            task.progress_percent
        ));
    }

    fn item_finished(&self, report: &ItemReport, run_percent: u8) {
        self.bar.inc(1);
        self.bar.set_prefix(format!("{:>3}%", run_percent));
        self.bar
            .println(format!("  {} {}", report.item.label(), report.outcome.label()));
    }

    fn run_finished(&self, _run: &OrchestrationRun) {
        self.bar.finish_and_clear();
    }
}
