//! Command-line argument definitions using clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::download::Session;
use crate::error::SessionError;

/// Social-media post downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "postgrab",
    version,
    about = "Download videos and images from Threads, Xiaohongshu and Douyin posts",
    long_about = "Parse a post URL into its media items, pick the ones you want and let the \n\
                  media backend download them.\n\n\
                  `postgrab serve` runs the gateway in front of the backend; `postgrab fetch` \n\
                  drives a download session against a running gateway."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file. A missing file means defaults.
    #[arg(short, long, default_value = "postgrab.toml", global = true)]
    pub config: PathBuf,

    /// Media backend base URL.
    #[arg(long, env = "BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Gateway base URL used by `fetch`.
    #[arg(long, env = "POSTGRAB_GATEWAY_URL", global = true)]
    pub gateway_url: Option<String>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the gateway in front of the media backend.
    Serve(ServeArgs),

    /// Print the platform a URL belongs to.
    Classify {
        /// Post URL.
        url: String,
    },

    /// Parse a post and download its selected media.
    Fetch(FetchArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct ServeArgs {
    /// Listen address, e.g. 0.0.0.0:3000.
    #[arg(short, long)]
    pub bind: Option<String>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct FetchArgs {
    /// Post URL.
    pub url: String,

    /// Download the whole post as one task, without parsing it into items.
    #[arg(long, conflicts_with_all = ["list", "only", "skip", "invert", "concurrency"])]
    pub direct: bool,

    /// Only list the media found; download nothing.
    #[arg(short, long)]
    pub list: bool,

    /// Download only these item ids (comma separated).
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub only: Option<Vec<usize>>,

    /// Leave out these item ids (comma separated).
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub skip: Vec<usize>,

    /// Flip the selection of every item.
    #[arg(long)]
    pub invert: bool,

    /// Items in flight at once (1 = one after another).
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Directory to save files into.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Milliseconds between status polls.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Status polls per item before giving up.
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,
}

impl FetchArgs {
    /// Apply `--only`, then `--skip`, then `--invert` to a freshly parsed session.
    pub fn apply_selection(&self, session: &mut Session) -> Result<(), SessionError> {
        if let Some(only) = &self.only {
            // toggle_all selects everything first when the selection is mixed.
            session.toggle_all()?;
            if session.selected_count() > 0 {
                session.toggle_all()?;
            }
            for id in only {
                session.toggle(*id)?;
            }
        }

        for id in &self.skip {
            session.toggle(*id)?;
        }

        if self.invert {
            let ids: Vec<usize> = session.items().iter().map(|item| item.id).collect();
            for id in ids {
                session.toggle(id)?;
            }
        }

        Ok(())
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(url) = &self.backend_url {
            config.backend.base_url = url.clone();
        }

        if let Some(url) = &self.gateway_url {
            config.client.gateway_url = url.clone();
        }

        match &self.command {
            Command::Serve(serve) => {
                if let Some(bind) = &serve.bind {
                    config.gateway.bind = bind.clone();
                }
            }
            Command::Fetch(fetch) => {
                if let Some(concurrency) = fetch.concurrency {
                    config.client.concurrency = concurrency;
                }

                if let Some(dir) = &fetch.output {
                    config.client.download_directory = Some(dir.clone());
                }

                if let Some(interval) = fetch.interval_ms {
                    config.client.poll_interval_ms = interval;
                }

                if let Some(attempts) = fetch.max_attempts {
                    config.client.max_poll_attempts = attempts;
                }

                if fetch.quiet {
                    config.client.show_progress = false;
                }
            }
            Command::Classify { .. } => {}
        }
    }
}
