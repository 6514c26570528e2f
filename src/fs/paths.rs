//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;

/// Directory finished files are saved to.
///
/// The configured directory (which `--output` overrides), then the user's
/// download folder, then the current directory.
pub fn output_directory(config: &Config) -> PathBuf {
    if let Some(dir) = &config.client.download_directory {
        return dir.clone();
    }

    directories::UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
