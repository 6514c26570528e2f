//! postgrab - CLI entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use postgrab::{
    api::GatewayClient,
    cli::{Args, Command, FetchArgs},
    config::{validate_config, Config},
    download::{classify_input, save_result, ProgressReporter, Session, SilentReporter},
    error::{exit_codes, Error, Result, SessionError},
    fs::{ensure_dir, output_directory},
    gateway,
    output::{
        create_item_bar, print_banner, print_error, print_fetch_summary, print_info,
        print_media_list, print_run_summary, print_success, print_warning, RunProgress,
    },
    platform::classify,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(exit_code_for(&e) as u8)
        }
    }
}

fn exit_code_for(e: &Error) -> i32 {
    match e {
        Error::Config(_)
        | Error::ConfigValidation { .. }
        | Error::MissingConfig(_)
        | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
        Error::Session(SessionError::UnsupportedUrl) => exit_codes::UNRECOGNIZED_URL,
        Error::Gateway(_) | Error::Session(SessionError::Gateway(_)) => {
            exit_codes::API_ERROR
        }
        Error::Session(_) | Error::Download(_) | Error::InvalidFilename(_) => {
            exit_codes::DOWNLOAD_ERROR
        }
        _ => exit_codes::UNEXPECTED_ERROR,
    }
}

async fn run() -> Result<i32> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    if let Command::Classify { url } = &args.command {
        return Ok(classify_command(url));
    }

    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_info(&format!(
            "No configuration file at {}, using defaults",
            args.config.display()
        ));
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    match &args.command {
        Command::Serve(_) => {
            gateway::serve(&config).await?;
            Ok(exit_codes::SUCCESS)
        }
        Command::Fetch(fetch) => fetch_command(&config, fetch).await,
        Command::Classify { url } => Ok(classify_command(url)),
    }
}

fn classify_command(url: &str) -> i32 {
    match classify(url) {
        Some(platform) => {
            println!("{}", platform);
            exit_codes::SUCCESS
        }
        None => {
            println!("unrecognized");
            exit_codes::UNRECOGNIZED_URL
        }
    }
}

/// Drive one session: parse, select, download, save.
async fn fetch_command(config: &Config, fetch: &FetchArgs) -> Result<i32> {
    let platform = classify_input(&fetch.url)?;
    let output_dir = output_directory(config);

    print_fetch_summary(
        fetch.url.trim(),
        platform,
        &config.client.gateway_url,
        &output_dir.display().to_string(),
    );

    let client = GatewayClient::new(&config.client.gateway_url, config.request_timeout())?;

    if fetch.direct {
        return fetch_direct(config, &client, &fetch.url, &output_dir).await;
    }

    let mut session = Session::new();

    print_info("Parsing post...");
    let found = session.parse(&client, &fetch.url).await?;
    print_info(&format!("Parsed {} media item(s)", found));

    fetch.apply_selection(&mut session)?;
    print_media_list(session.items());

    if fetch.list {
        return Ok(exit_codes::SUCCESS);
    }

    ensure_dir(&output_dir)?;

    let reporter: Box<dyn ProgressReporter> = if config.client.show_progress {
        Box::new(RunProgress::new())
    } else {
        Box::new(SilentReporter)
    };

    let outcome = session
        .download(&client, config.run_options(), reporter.as_ref())
        .await
        .map(|_| ());

    let mut saved: Vec<PathBuf> = Vec::new();
    for result_url in session.result_urls() {
        match save_result(&client, result_url, &output_dir, config.client.show_progress).await {
            Ok(path) => saved.push(path),
            Err(e) => print_warning(&format!("Could not save {}: {}", result_url, e)),
        }
    }

    if let Some(run) = session.run() {
        print_run_summary(run, &saved);
    }

    outcome?;

    if saved.is_empty() {
        return Err(Error::Download("no result file could be saved".to_string()));
    }

    print_success(&format!(
        "Saved {} file(s) to {}",
        saved.len(),
        output_dir.display()
    ));
    Ok(exit_codes::SUCCESS)
}

/// Download a whole post as one backend task and save its result.
async fn fetch_direct(
    config: &Config,
    client: &GatewayClient,
    url: &str,
    output_dir: &Path,
) -> Result<i32> {
    ensure_dir(output_dir)?;

    let bar = config.client.show_progress.then(|| {
        let bar = create_item_bar(100, "submitting");
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    });

    print_info("Submitting post...");
    let mut session = Session::new();
    let outcome = session
        .download_direct(client, url, config.run_options().poller, |task| {
            if let Some(bar) = &bar {
                bar.set_position(u64::from(task.progress_percent));
                bar.set_message(task.status.as_str());
            }
        })
        .await
        .map(|task| task.task_id.clone());

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let task_id = outcome?;
    print_info(&format!("Task {} completed", task_id));

    let Some(result_url) = session.result_urls().first().map(|u| u.to_string()) else {
        return Err(Error::Download("task finished without a result".to_string()));
    };

    let path = save_result(client, &result_url, output_dir, config.client.show_progress).await?;
    print_success(&format!("Saved {}", path.display()));
    Ok(exit_codes::SUCCESS)
}
