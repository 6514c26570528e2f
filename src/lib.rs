//! postgrab - parse social-media posts into media items and download them
//!
//! A post URL from Threads, Xiaohongshu or Douyin is classified locally,
//! parsed by a media backend into video and image items, and each selected
//! item is downloaded as a backend task that is polled until it finishes.
//!
//! # Features
//!
//! - Local platform classification of post URLs
//! - A gateway that forwards to the backend and normalizes every failure to
//!   `{"error": "..."}`
//! - An explicit session state machine (parse, select, download, reset)
//! - Sequential runs by default, opt-in bounded concurrency
//! - Bounded fixed-interval task polling, also for whole-post downloads
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use postgrab::{GatewayClient, RunOptions, Session, SilentReporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GatewayClient::new("http://127.0.0.1:3000", Duration::from_secs(30))?;
//!     let mut session = Session::new();
//!
//!     session.parse(&client, "https://www.threads.net/@user/post/abc").await?;
//!     let run = session
//!         .download(&client, RunOptions::default(), &SilentReporter)
//!         .await?;
//!     for url in run.result_urls() {
//!         println!("{}", url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod gateway;
pub mod media;
pub mod output;
pub mod platform;

// Re-exports for convenience
pub use api::{GatewayClient, MediaGateway};
pub use config::Config;
pub use download::{
    DownloadTask, OrchestrationRun, RunMode, RunOptions, Session, SessionPhase, SilentReporter,
    TaskPoller,
};
pub use error::{Error, Result};
pub use media::{MediaItem, MediaKind};
pub use platform::{classify, Platform};
