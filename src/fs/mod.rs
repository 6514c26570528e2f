//! Filesystem module.
//!
//! Provides:
//! - Filename validation and derivation from result URLs
//! - Output directory management

pub mod naming;
pub mod paths;

pub use naming::{filename_from_url, make_unique_filename, sanitize_filename};
pub use paths::{ensure_dir, output_directory};
