//! Run manifest (`manifest.json`)
//!
//! The manifest lists every successful transfer of a run, in record order.
//! It is built once from the full outcome list and written once at the end;
//! a crash mid-run leaves images and sidecars on disk but no manifest.

use crate::error::ManifestError;
use crate::record::{Record, FIELD_AUTHOR, FIELD_COUNTRY, FIELD_DESCRIPTION, FIELD_ID};
use crate::transfer::TransferOutcome;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One successfully stored image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,

    pub description: String,

    /// Author handle as it appears in the source row
    pub photographer: String,

    pub country: String,

    /// Description split on whitespace
    pub tags: Vec<String>,

    /// Image path relative to the root, `/`-separated
    pub path: String,
}

impl ManifestEntry {
    /// Build the entry for a record stored at `path`
    pub fn from_record(record: &Record, path: String) -> Self {
        let description = record.get_or_empty(FIELD_DESCRIPTION);

        Self {
            id: record.get_or_empty(FIELD_ID).to_string(),
            description: description.to_string(),
            photographer: record.get_or_empty(FIELD_AUTHOR).to_string(),
            country: record.get_or_empty(FIELD_COUNTRY).to_string(),
            tags: description.split_whitespace().map(str::to_string).collect(),
            path,
        }
    }
}

/// Ordered list of successful transfers, serialized as a bare JSON array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Keep only the successes, preserving their order
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a TransferOutcome>) -> Self {
        let entries = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                TransferOutcome::Success(entry) => Some(entry.clone()),
                TransferOutcome::Failure { .. } => None,
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the manifest as pretty-printed JSON, replacing any previous file
    pub async fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| ManifestError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Read a manifest written by [`Manifest::save`]
    pub async fn load(path: &Path) -> Result<Self, ManifestError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ManifestError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Aggregate the run's outcomes and persist them in a single write
pub async fn write_manifest(
    outcomes: &[TransferOutcome],
    path: &Path,
) -> Result<Manifest, ManifestError> {
    let manifest = Manifest::from_outcomes(outcomes);
    manifest.save(path).await?;

    info!(
        path = %path.display(),
        entries = manifest.len(),
        "Manifest written"
    );
    Ok(manifest)
}
