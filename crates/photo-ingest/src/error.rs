//! Error types for photo ingestion
//!
//! Transfer errors never escape a single record: the transfer unit turns them
//! into a failed outcome. Manifest errors are logged by the pipeline driver.
//! Only [`IngestError`] stops a run, and only before any transfer starts.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline bootstrap
pub type Result<T> = std::result::Result<T, IngestError>;

/// Why a single record could not be transferred
#[derive(Error, Debug)]
pub enum TransferError {
    /// Missing id/url, or a url without an HTTP scheme
    #[error("invalid record")]
    InvalidRecord,

    /// Server answered with a non-2xx status
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// Connection, TLS, timeout or body read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Directory creation or file write failed
    #[error("failed to write {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata sidecar could not be encoded
    #[error("failed to encode metadata: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TransferError {
    /// Create a filesystem error for the given path
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for TransferError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Http {
                status: status.as_u16(),
            },
            None => Self::Transport(err.to_string()),
        }
    }
}

/// Failure to persist or read back the manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to write manifest {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode manifest: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that abort a run before the first group starts
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read records from {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl IngestError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
