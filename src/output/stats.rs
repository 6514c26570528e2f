//! Media listings and run summaries.

use std::path::PathBuf;

use console::style;

use crate::download::{ItemOutcome, OrchestrationRun};
use crate::media::MediaItem;

/// Print the parsed media list with selection marks.
pub fn print_media_list(items: &[MediaItem]) {
    println!();
    println!("{}", style(format!("Found {} media item(s):", items.len())).bold());
    for item in items {
        let mark = if item.selected { "[x]" } else { "[ ]" };
        println!("  {} {}  {}", mark, item.label(), style(&item.source_url).dim());
    }
    let selected = items.iter().filter(|i| i.selected).count();
    println!("  {} of {} selected", selected, items.len());
}

/// Print per-item outcomes and totals for a finished run.
pub fn print_run_summary(run: &OrchestrationRun, saved: &[PathBuf]) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run Summary:").bold());

    for report in run.reports() {
        let detail = match &report.outcome {
            ItemOutcome::Completed { result_url } => style(result_url.clone()).green(),
            ItemOutcome::Failed { message } | ItemOutcome::SubmitFailed { message } => {
                style(message.clone()).red()
            }
            ItemOutcome::TimedOut { attempts } => {
                style(format!("no result after {} polls", attempts)).yellow()
            }
        };
        println!(
            "  {:<18} {:<18} {}",
            report.item.label(),
            report.outcome.label(),
            detail
        );
    }

    println!();
    println!("  Succeeded: {}", style(run.succeeded()).green());
    if run.failed() > 0 {
        println!(
            "  Failed:    {} ({} timed out)",
            style(run.failed()).red(),
            run.timed_out()
        );
    }
    println!("  Saved:     {} file(s)", saved.len());
    for path in saved {
        println!("    {}", path.display());
    }
    println!(
        "  Started:   {}",
        run.started_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Duration:  {:.1}s",
        run.elapsed().num_milliseconds() as f64 / 1000.0
    );
    println!("{}", style("═".repeat(50)).dim());
}
