//! Console output utilities.

use console::style;

use crate::platform::Platform;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     postgrab                                          ║
║     Threads / Xiaohongshu / Douyin media downloader   ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print what a fetch is about to do.
pub fn print_fetch_summary(url: &str, platform: Platform, gateway: &str, output_dir: &str) {
    println!();
    println!("{}", style("Fetch:").bold());
    println!("  Post:      {}", url);
    println!("  Platform:  {}", platform.display_name());
    println!("  Gateway:   {}", gateway);
    println!("  Directory: {}", output_dir);
    println!();
}
