//! Run driver: source → scheduler → manifest

use crate::config::IngestConfig;
use crate::error::Result;
use crate::manifest::write_manifest;
use crate::progress::transfer_progress;
use crate::record::Record;
use crate::scheduler::BatchScheduler;
use crate::source::read_records;
use crate::transfer::{Fetcher, HttpFetcher, TransferOutcome, TransferUnit};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

/// Counts reported at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,

    /// Where the manifest was written; `None` if writing it failed
    pub manifest_path: Option<PathBuf>,
}

impl RunSummary {
    fn from_outcomes(outcomes: &[TransferOutcome], manifest_path: Option<PathBuf>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            processed: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            manifest_path,
        }
    }
}

/// Read the configured CSV and transfer every record over HTTP
pub async fn run(config: &IngestConfig) -> Result<RunSummary> {
    config.validate()?;

    let records = read_records(config.input_path(), config.limit)?;
    let fetcher = HttpFetcher::new(config)?;

    run_records(config, fetcher, records).await
}

/// Transfer already-loaded records through `fetcher`
///
/// Only bootstrap problems (invalid config, uncreatable output directory)
/// return an error. Per-record failures end up in the summary counts and a
/// failed manifest write is logged and reported as `manifest_path: None`.
pub async fn run_records<F: Fetcher + 'static>(
    config: &IngestConfig,
    fetcher: F,
    records: Vec<Record>,
) -> Result<RunSummary> {
    config.validate()?;

    let output_root = config.output_root();
    tokio::fs::create_dir_all(&output_root).await?;

    info!(
        records = records.len(),
        group_size = config.group_size,
        output = %output_root.display(),
        "Starting transfer run"
    );

    let progress = transfer_progress(records.len() as u64, config.show_progress);
    let scheduler = BatchScheduler::new(TransferUnit::from_config(fetcher, config), config.group_size)
        .with_progress(progress);

    let outcomes = scheduler.run_all(&records).await;

    let manifest_path = config.manifest_path();
    let written = match write_manifest(&outcomes, &manifest_path).await {
        Ok(_) => Some(manifest_path),
        Err(err) => {
            error!(error = %err, "Manifest could not be written; downloaded files are kept");
            None
        },
    };

    let summary = RunSummary::from_outcomes(&outcomes, written);
    info!(
        processed = summary.processed,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Transfer run complete"
    );

    Ok(summary)
}
