//! Download module: selection, orchestration and polling.
//!
//! This module provides:
//! - The session state machine driving parse, select and download
//! - Item selection
//! - Sequential (or opt-in concurrent) orchestration of selected items
//! - Bounded task polling
//! - Saving finished artifacts locally

pub mod orchestrator;
pub mod parse;
pub mod poller;
pub mod progress;
pub mod run;
pub mod save;
pub mod selection;
pub mod state;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;

pub use orchestrator::{Orchestrator, RunMode, RunOptions, MAX_CONCURRENCY};
pub use parse::{classify_input, fetch_media};
pub use poller::{PollOutcome, TaskPoller, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
pub use progress::{ProgressReporter, SilentReporter};
pub use run::{ItemOutcome, ItemReport, OrchestrationRun};
pub use save::save_result;
pub use selection::Selection;
pub use state::{Session, SessionPhase};
pub use task::DownloadTask;
