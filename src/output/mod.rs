//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress bars and the console run reporter
//! - Media listings and run summaries

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_error, print_fetch_summary, print_info, print_success, print_warning,
};
pub use progress::{create_download_bar, create_item_bar, RunProgress};
pub use stats::{print_media_list, print_run_summary};
