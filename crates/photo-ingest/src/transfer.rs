//! Single-record transfer
//!
//! [`TransferUnit::transfer`] fetches one image and writes it plus a JSON
//! sidecar of the source row. Every error is folded into a
//! [`TransferOutcome::Failure`] so callers never see a `Result` here.

use crate::config::IngestConfig;
use crate::error::{IngestError, TransferError};
use crate::manifest::ManifestEntry;
use crate::path::build_path;
use crate::record::{Record, FIELD_ID};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of attempting one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Success(ManifestEntry),
    Failure { id: String, reason: String },
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success(_))
    }

    /// Id of the record this outcome belongs to (may be empty for invalid rows)
    pub fn id(&self) -> &str {
        match self {
            TransferOutcome::Success(entry) => &entry.id,
            TransferOutcome::Failure { id, .. } => id,
        }
    }

    pub fn failed(record: &Record, reason: impl Into<String>) -> Self {
        TransferOutcome::Failure {
            id: record.get_or_empty(FIELD_ID).to_string(),
            reason: reason.into(),
        }
    }
}

/// Network seam: GET a URL and return the whole body
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransferError>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransferError> {
        (**self).fetch(url).await
    }
}

/// [`Fetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the configured timeout and User-Agent
    pub fn new(config: &IngestConfig) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransferError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

/// Fetches and persists one record at a time
pub struct TransferUnit<F> {
    fetcher: F,
    output_root: PathBuf,
    output_dir: String,
}

impl<F: Fetcher> TransferUnit<F> {
    /// `output_root` is where files are written; `output_dir` is the name
    /// recorded in manifest paths.
    pub fn new(fetcher: F, output_root: impl Into<PathBuf>, output_dir: impl Into<String>) -> Self {
        Self {
            fetcher,
            output_root: output_root.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Build a unit from run configuration
    pub fn from_config(fetcher: F, config: &IngestConfig) -> Self {
        Self::new(fetcher, config.output_root(), config.output_dir.clone())
    }

    /// Transfer one record. Never fails; errors become a `Failure` outcome.
    pub async fn transfer(&self, record: &Record) -> TransferOutcome {
        match self.try_transfer(record).await {
            Ok(entry) => {
                info!(photo_id = %entry.id, path = %entry.path, "Downloaded image");
                TransferOutcome::Success(entry)
            },
            Err(err) => {
                let outcome = TransferOutcome::failed(record, err.to_string());
                warn!(photo_id = %outcome.id(), reason = %err, "Transfer failed");
                outcome
            },
        }
    }

    async fn try_transfer(&self, record: &Record) -> Result<ManifestEntry, TransferError> {
        let url = match (record.id(), record.image_url()) {
            (Some(_), Some(url)) if is_http_url(url) => url,
            _ => return Err(TransferError::InvalidRecord),
        };

        let storage = build_path(record);

        let dir = storage.directory(&self.output_root);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| TransferError::filesystem(&dir, e))?;

        debug!(url, "Fetching image");
        let body = self.fetcher.fetch(url).await?;

        let image_path = storage.image_path(&self.output_root);
        tokio::fs::write(&image_path, &body)
            .await
            .map_err(|e| TransferError::filesystem(&image_path, e))?;

        let metadata = serde_json::to_vec_pretty(record)?;
        let metadata_path = storage.metadata_path(&self.output_root);
        tokio::fs::write(&metadata_path, metadata)
            .await
            .map_err(|e| TransferError::filesystem(&metadata_path, e))?;

        Ok(ManifestEntry::from_record(
            record,
            storage.manifest_path(&self.output_dir),
        ))
    }
}

/// `http://` or `https://`, case-insensitive
pub fn is_http_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
