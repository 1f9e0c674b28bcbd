//! photo-ingest - download the images listed in a CSV file

use anyhow::Result;
use clap::Parser;
use photo_common::logging::{init_logging, LogConfig, LogLevel};
use photo_ingest::{pipeline, IngestConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "photo-ingest")]
#[command(author, version, about = "Download images listed in a CSV file")]
struct Cli {
    /// Root directory that input and output paths are relative to
    #[arg(long)]
    root: Option<PathBuf>,

    /// CSV file with one photo per row
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory name
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Number of images downloaded concurrently
    #[arg(short, long)]
    group_size: Option<usize>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Only process the first N rows
    #[arg(long)]
    limit: Option<usize>,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flags override whatever the defaults and environment provided
    fn apply_to(self, mut config: IngestConfig) -> IngestConfig {
        if let Some(root) = self.root {
            config.root = root;
        }
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(size) = self.group_size {
            config.group_size = size;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if self.limit.is_some() {
            config.limit = self.limit;
        }
        config.show_progress = !self.no_progress;

        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over the flag
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("photo-ingest")
        .filter_directives("hyper=warn,reqwest=warn")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    let config = cli.apply_to(IngestConfig::from_env()?);
    info!(input = %config.input_path().display(), "Ingesting photos");

    let summary = pipeline::run(&config).await?;

    info!(
        processed = summary.processed,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Ingestion complete"
    );
    Ok(())
}
